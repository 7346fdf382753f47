use std::{fs, path::Path};

use miette::{IntoDiagnostic, WrapErr, miette};
use vopt_core::{Scalar, VariantMap};

/// Loads a variant file: a JSON object or a TOML table of scalars.
///
/// Nested TOML tables are flattened with dotted keys, so `qx.debug = "on"`
/// and `"qx.debug" = "on"` name the same variant.
pub fn load_variants(path: &Path) -> miette::Result<VariantMap> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read variants from {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_toml(&content),
        Some("json") | None => VariantMap::from_json(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid variants file {}", path.display())),
        Some(ext) => Err(miette!(
            "Unsupported variants file extension \"{ext}\": {}",
            path.display()
        )),
    }
}

fn parse_toml(content: &str) -> miette::Result<VariantMap> {
    let table = toml::from_str::<toml::Table>(content).into_diagnostic()?;
    let mut variants = VariantMap::new();
    flatten_toml(&mut variants, None, &table)?;
    Ok(variants)
}

fn flatten_toml(
    variants: &mut VariantMap,
    prefix: Option<&str>,
    table: &toml::Table,
) -> miette::Result<()> {
    for (key, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        let value = match value {
            toml::Value::String(s) => Scalar::from(s.as_str()),
            toml::Value::Integer(n) => Scalar::Int(*n),
            toml::Value::Float(f) => Scalar::Float(*f),
            toml::Value::Boolean(b) => Scalar::Bool(*b),
            toml::Value::Table(table) => {
                flatten_toml(variants, Some(&key), table)?;
                continue;
            }
            toml::Value::Datetime(_) | toml::Value::Array(_) => {
                return Err(miette!("Variant \"{key}\" must be a string, number or boolean"));
            }
        };
        variants.insert(key, value);
    }
    Ok(())
}

/// Parses a `KEY=VALUE` override. The value is read as a JSON scalar
/// (`true`, `3`, `null`, `"text"`), anything else is taken as a string.
pub fn parse_assignment(s: &str) -> Result<(String, Scalar), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    let value = serde_json::from_str::<Scalar>(value).unwrap_or_else(|_| Scalar::from(value));
    Ok((key.to_string(), value))
}
