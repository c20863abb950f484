//! Schema-driven field collection
//!
//! Turns a schema, optional prior values and user input into a value bag.
//! Never touches the registry or the store.

use serde_json::{Number, Value};
use url::Url;

use crate::error::{ProfileError, ProfileResult};
use crate::profile::{fields, FieldSchema, FieldType, FieldValues, ProfileSchema};
use crate::ui::{InputRequest, PickRequest, Prompter};

/// Inputs that mean "no endpoint configured"
const HOST_PLACEHOLDERS: [&str; 2] = ["https://", "http://"];

const REJECT_CHOICES: [&str; 2] = [
    "True - Reject connections with self-signed certificates",
    "False - Accept connections with self-signed certificates",
];

const BOOLEAN_CHOICES: [&str; 2] = ["True", "False"];

/// Parse a free-form `url[:port]` into a host and a port.
///
/// Empty or placeholder input yields `("", 0)`. A missing port is reported
/// as 0.
///
/// # Errors
/// Returns `InvalidInput` when the value is not URL-shaped
pub fn parse_host(input: &str) -> ProfileResult<(String, u16)> {
    let trimmed = input.trim();
    if trimmed.is_empty() || HOST_PLACEHOLDERS.contains(&trimmed) {
        return Ok((String::new(), 0));
    }

    let authority = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    if authority.is_empty() {
        return Ok((String::new(), 0));
    }

    // A non-special scheme keeps explicit default ports such as :443
    let url = Url::parse(&format!("hostbook://{authority}"))
        .map_err(|e| ProfileError::InvalidInput(format!("'{trimmed}' is not a valid host: {e}")))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ProfileError::InvalidInput(format!("'{trimmed}' has no host name")))?;

    Ok((host.to_string(), url.port().unwrap_or(0)))
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn value_as_port(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_number(input: &str) -> Option<Number> {
    let trimmed = input.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

fn prompt_text(field: &FieldSchema) -> String {
    field
        .description
        .clone()
        .unwrap_or_else(|| format!("Enter a value for {}", field.name))
}

/// Collects profile field values through a `Prompter`
pub struct FieldCollector<'a> {
    prompter: &'a mut dyn Prompter,
}

impl<'a> FieldCollector<'a> {
    pub fn new(prompter: &'a mut dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Collect every schema field, seeded with `prior` values.
    ///
    /// A `Value::Null` in the result means the field was cleared. Absent
    /// keys were left undefined.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an unparseable host or port and
    /// `OperationCancelled` when a required choice is dismissed
    pub fn collect(
        &mut self,
        schema: &ProfileSchema,
        prior: Option<&FieldValues>,
    ) -> ProfileResult<FieldValues> {
        let prior_value = |name: &str| prior.and_then(|p| p.get(name)).filter(|v| !v.is_null());
        let mut values = FieldValues::new();

        // Host is collected first since it decides whether port is asked
        let mut endpoint: Option<(String, u16)> = None;
        if schema.field(fields::HOST).is_some() {
            let host_value = prior_value(fields::HOST).and_then(value_as_text);
            let port_value = prior_value(fields::PORT).and_then(value_as_port);
            let (host, port) = self.collect_host(host_value, port_value)?;
            values.insert(fields::HOST.to_string(), Value::String(host.clone()));
            endpoint = Some((host, port));
        }

        for field in &schema.fields {
            match field.name.as_str() {
                fields::HOST => {}
                fields::PORT => {
                    let port = match &endpoint {
                        Some((host, _)) if host.is_empty() => 0,
                        Some((_, port)) if *port != 0 => *port,
                        _ => self.collect_port(field, prior_value(fields::PORT).and_then(value_as_port))?,
                    };
                    values.insert(fields::PORT.to_string(), Value::from(port));
                }
                fields::USER => {
                    let value = self.collect_text(
                        InputRequest::new(prompt_text(field))
                            .value(prior_value(fields::USER).and_then(value_as_text)),
                    );
                    values.insert(fields::USER.to_string(), value);
                }
                fields::PASSWORD => {
                    let value = self.collect_text(
                        InputRequest::new(prompt_text(field))
                            .value(prior_value(fields::PASSWORD).and_then(value_as_text))
                            .password(),
                    );
                    values.insert(fields::PASSWORD.to_string(), value);
                }
                fields::REJECT_UNAUTHORIZED => {
                    let current = prior_value(fields::REJECT_UNAUTHORIZED)
                        .or(field.default.as_ref())
                        .and_then(Value::as_bool);
                    let reject = self.collect_reject_unauthorized(current)?;
                    values.insert(fields::REJECT_UNAUTHORIZED.to_string(), Value::Bool(reject));
                }
                _ => {
                    if let Some(value) = self.collect_generic(field, prior_value(field.name.as_str()))? {
                        values.insert(field.name.clone(), value);
                    }
                }
            }
        }

        // Host parsing may yield a port even when the schema has no port field
        if let Some((_, port)) = endpoint {
            if port != 0 && !values.contains_key(fields::PORT) {
                values.insert(fields::PORT.to_string(), Value::from(port));
            }
        }

        Ok(values)
    }

    fn collect_host(
        &mut self,
        prior_host: Option<String>,
        prior_port: Option<u16>,
    ) -> ProfileResult<(String, u16)> {
        let current = prior_host.filter(|h| !h.is_empty()).map(|h| match prior_port {
            Some(p) if p != 0 => format!("{h}:{p}"),
            _ => h,
        });
        let request = InputRequest::new("Enter a URL in the format 'url:port'")
            .placeholder("https://")
            .value(current);

        let input = self
            .prompter
            .input(&request)
            .ok_or_else(|| ProfileError::cancelled("no host entered"))?;
        parse_host(&input)
    }

    fn collect_port(&mut self, field: &FieldSchema, prior: Option<u16>) -> ProfileResult<u16> {
        let default = field.default.as_ref().and_then(value_as_port);
        let request = InputRequest::new(prompt_text(field))
            .value(prior.filter(|p| *p != 0).or(default).map(|p| p.to_string()));

        let input = self
            .prompter
            .input(&request)
            .ok_or_else(|| ProfileError::cancelled("no port entered"))?;
        let trimmed = input.trim();

        let port = if trimmed.is_empty() {
            0
        } else if let Ok(port) = trimmed.parse::<u16>() {
            port
        } else if let Some(default) = default {
            tracing::debug!(input = %trimmed, default, "non-numeric port, using schema default");
            return Ok(default);
        } else {
            return Err(ProfileError::InvalidInput(format!(
                "'{trimmed}' is not a valid port number"
            )));
        };

        Ok(match (port, default) {
            (0, Some(default)) => default,
            _ => port,
        })
    }

    fn collect_text(&mut self, request: InputRequest) -> Value {
        match self.prompter.input(&request) {
            Some(text) if !text.trim().is_empty() => Value::String(text.trim().to_string()),
            _ => Value::Null,
        }
    }

    fn collect_reject_unauthorized(&mut self, current: Option<bool>) -> ProfileResult<bool> {
        let request = PickRequest::new(
            "Reject unauthorized connections",
            REJECT_CHOICES.iter().map(ToString::to_string).collect(),
        )
        .selected(current.map(|reject| usize::from(!reject)));

        match self.prompter.pick(&request) {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(ProfileError::cancelled(
                "no selection made for rejectUnauthorized",
            )),
        }
    }

    fn collect_generic(
        &mut self,
        field: &FieldSchema,
        prior: Option<&Value>,
    ) -> ProfileResult<Option<Value>> {
        let current = prior.or(field.default.as_ref());

        match field.field_type.resolve() {
            FieldType::Boolean => {
                let request = PickRequest::new(
                    prompt_text(field),
                    BOOLEAN_CHOICES.iter().map(ToString::to_string).collect(),
                )
                .selected(current.and_then(Value::as_bool).map(|b| usize::from(!b)));

                match self.prompter.pick(&request) {
                    Some(0) => Ok(Some(Value::Bool(true))),
                    Some(1) => Ok(Some(Value::Bool(false))),
                    _ => Err(ProfileError::cancelled(format!(
                        "no selection made for {}",
                        field.name
                    ))),
                }
            }
            FieldType::Number => {
                let request =
                    InputRequest::new(prompt_text(field)).value(current.and_then(value_as_text));
                let parsed = self
                    .prompter
                    .input(&request)
                    .as_deref()
                    .and_then(parse_number)
                    .map(Value::Number);
                Ok(parsed.or_else(|| field.default.clone()))
            }
            FieldType::String => {
                let mut request =
                    InputRequest::new(prompt_text(field)).value(current.and_then(value_as_text));
                if fields::is_secret(&field.name) {
                    request = request.password();
                }
                Ok(Some(self.collect_text(request)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_placeholders() {
        assert_eq!(parse_host("https://").unwrap(), (String::new(), 0));
        assert_eq!(parse_host("http://").unwrap(), (String::new(), 0));
        assert_eq!(parse_host("   ").unwrap(), (String::new(), 0));
    }

    #[test]
    fn test_parse_host_splits_port() {
        assert_eq!(parse_host("myhost:443").unwrap(), ("myhost".to_string(), 443));
        assert_eq!(
            parse_host("https://example.com:10443").unwrap(),
            ("example.com".to_string(), 10443)
        );
        assert_eq!(parse_host("https://example.com").unwrap(), ("example.com".to_string(), 0));
        assert_eq!(
            parse_host("http://example.com:8080/api/v1").unwrap(),
            ("example.com".to_string(), 8080)
        );
    }

    #[test]
    fn test_parse_host_rejects_garbage() {
        assert!(matches!(parse_host("my host"), Err(ProfileError::InvalidInput(_))));
        assert!(matches!(parse_host("host:notaport"), Err(ProfileError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(Number::from(42)));
        assert_eq!(parse_number(" 1.5 "), Number::from_f64(1.5));
        assert_eq!(parse_number("abc"), None);
    }
}
