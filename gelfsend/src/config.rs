use std::{env, str::FromStr};

use serde_json::{Map, Value};

use crate::{compress, diagnostics, fields, packet, transport, Error};

/**
Appender configuration.

Configuration can be deserialized from the same flat JSON object
that's accepted by other GELF appenders:

```json
{
    "host": "graylog.local",
    "port": 12201,
    "hostname": "web-1",
    "facility": "billing",
    "customFields": { "_env": "prod" },
    "appendCategory": "category"
}
```
*/
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub transport: transport::Config,
    #[serde(flatten)]
    pub packet: packet::Config,
    #[serde(flatten)]
    pub fields: fields::Config,
    #[serde(flatten)]
    pub compress: compress::Config,
    #[serde(skip)]
    pub diagnostics: diagnostics::Config,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Config::default();

        read_environment(&mut config.transport.host, "GELF_HOST")?;
        read_environment(&mut config.transport.port, "GELF_PORT")?;
        read_environment(&mut config.packet.hostname, "GELF_HOSTNAME")?;
        read_environment(&mut config.compress.compression, "GELF_COMPRESSION")?;

        read_optional(&mut config.fields.facility, "GELF_FACILITY")?;
        read_optional(&mut config.fields.append_category, "GELF_APPEND_CATEGORY")?;

        if let Some(custom_fields) = read_var("GELF_CUSTOM_FIELDS")? {
            config.fields.custom_fields = parse_custom_fields(&custom_fields)?;
        }

        if is_truthy("GELF_ENABLE_DIAGNOSTICS")? {
            config.diagnostics.min_level = diagnostics::Level::Debug;
        }

        Ok(config)
    }
}

fn parse_custom_fields(json: &str) -> Result<Map<String, Value>, Error> {
    match serde_json::from_str(json)? {
        Value::Object(fields) => Ok(fields),
        _ => bail!("custom fields must be a JSON object"),
    }
}

fn is_truthy(name: impl AsRef<str>) -> Result<bool, Error> {
    match env::var(name.as_ref()) {
        // The evironment variable contains a truthy value
        Ok(ref v) if v == "True" || v == "true" => Ok(true),
        // The environment variable is not set or doesn't contain
        // a truthy value
        Ok(_) | Err(env::VarError::NotPresent) => Ok(false),
        // The environment variable is invalid
        Err(e) => Err(e.into()),
    }
}

fn read_var(name: impl AsRef<str>) -> Result<Option<String>, Error> {
    match env::var(name.as_ref()) {
        // The environment variable exists, but is empty
        Ok(ref v) if v.is_empty() => Ok(None),
        // The environment variable does not exist
        Err(env::VarError::NotPresent) => Ok(None),
        // The environment variable is invalid
        Err(e) => Err(e.into()),
        // The environment variable has a value
        Ok(v) => Ok(Some(v)),
    }
}

fn read_environment<T>(into: &mut T, name: impl AsRef<str>) -> Result<(), Error>
where
    T: FromStr,
    Error: From<T::Err>,
{
    if let Some(v) = read_var(name)? {
        *into = T::from_str(&v)?;
    }

    Ok(())
}

fn read_optional(into: &mut Option<String>, name: impl AsRef<str>) -> Result<(), Error> {
    if let Some(v) = read_var(name)? {
        *into = Some(v);
    }

    Ok(())
}
