//! File-copy handler: render a template and replace the project file

use fleet_fs::{NormalizedPath, io};

use super::{
    ApplyContext, ApplyResult, ConfigType, RenderContext, TemplateFormat, commit, read_template,
    render,
};
use crate::{Error, Result};

pub(super) fn apply(
    config_type: ConfigType,
    format: TemplateFormat,
    target: &NormalizedPath,
    ctx: &ApplyContext<'_>,
) -> Result<ApplyResult> {
    let Some(template_path) = ctx.template_for(config_type) else {
        return Ok(ApplyResult::skipped("no template for this config type"));
    };
    let template = read_template(&template_path)?;

    let rendered = render(&template, &RenderContext::from(ctx.project)).map_err(|message| {
        Error::Template {
            path: template_path.to_native(),
            message,
        }
    })?;
    let content = append_lines(rendered, ctx.project.extra_lines(config_type));
    check_format(&content, format, config_type.output_file())?;

    let original = io::read_optional_text(target)?;
    commit(target, original.as_deref(), &content, ctx)
}

/// Append `lines` after `content`, one per line.
fn append_lines(content: String, lines: &[String]) -> String {
    if lines.is_empty() {
        return content;
    }
    let mut out = content.trim_end_matches('\n').to_string();
    out.push('\n');
    out.push_str(&lines.join("\n"));
    out.push('\n');
    out
}

/// Parse rendered content as its declared format.
pub(super) fn check_format(content: &str, format: TemplateFormat, file: &str) -> Result<()> {
    let parsed = match format {
        TemplateFormat::Toml => content
            .parse::<toml_edit::DocumentMut>()
            .map(drop)
            .map_err(|e| e.to_string()),
        TemplateFormat::Yaml => serde_yaml::from_str::<serde_yaml::Value>(content)
            .map(drop)
            .map_err(|e| e.to_string()),
        TemplateFormat::Json => serde_json::from_str::<serde_json::Value>(content)
            .map(drop)
            .map_err(|e| e.to_string()),
        TemplateFormat::Text => Ok(()),
    };

    parsed.map_err(|message| Error::Validation {
        file: file.to_string(),
        format: format.as_str().to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extra_lines_follow_content() {
        let out = append_lines("*.pyc\n\n".to_string(), &["/data".into(), "/tmp".into()]);
        assert_eq!(out, "*.pyc\n/data\n/tmp\n");
    }

    #[test]
    fn no_extra_lines_keeps_content() {
        assert_eq!(append_lines("*.pyc".to_string(), &[]), "*.pyc");
    }

    #[test]
    fn invalid_json_is_rejected() {
        let err = check_format("{ \"a\": ", TemplateFormat::Json, ".prettierrc").unwrap_err();
        assert!(matches!(err, Error::Validation { ref format, .. } if format == "JSON"));
    }

    #[test]
    fn text_is_never_rejected() {
        assert!(check_format("{{{", TemplateFormat::Text, ".gitignore").is_ok());
        assert!(check_format("line-length = 110\n", TemplateFormat::Toml, ".ruff.toml").is_ok());
        assert!(check_format("rules: {}\n", TemplateFormat::Yaml, ".yamllint.yaml").is_ok());
    }
}
