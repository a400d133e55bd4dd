/*!
Custom field merging.

GELF custom fields are any properties prefixed with `_`. They can come from
configuration, from the event category, or from a marked object passed as
the first argument to a log call:

```text
logger.info({ "GELF": true, "_user": "alice" }, "logged in")
```
*/

use serde_json::{Map, Value};

use crate::event::LogEvent;

/**
The key that marks the first data item of an event as a set of custom fields.
*/
pub const GELF_MARKER: &str = "GELF";

/**
Configuration for custom fields.
*/
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /**
    A value to attach to every message as `_facility`.
    */
    pub facility: Option<String>,
    /**
    Fields to attach to every message.
    */
    pub custom_fields: Map<String, Value>,
    /**
    The name of a field to attach the event category to.

    The field is prefixed with `_`, so a name of `category` is sent as `_category`.
    */
    pub append_category: Option<String>,
}

/**
Merges custom fields from configuration and events.
*/
#[derive(Debug, Clone)]
pub struct Merger {
    defaults: Map<String, Value>,
    category_field: Option<String>,
}

impl Merger {
    pub fn new(config: Config) -> Self {
        let mut defaults = config.custom_fields;

        if let Some(facility) = config.facility {
            defaults.insert("_facility".to_owned(), Value::String(facility));
        }

        Merger {
            defaults,
            category_field: config.append_category.map(|name| format!("_{}", name)),
        }
    }

    /**
    Collect the custom fields for an event.

    If the first data item of the event is a custom field carrier then
    it's removed from the event.
    */
    pub fn merge(&self, evt: &mut LogEvent) -> Map<String, Value> {
        let mut fields = Map::new();

        copy_accepted(&self.defaults, &mut fields);

        if let Some(ref name) = self.category_field {
            fields.insert(name.clone(), Value::String(evt.category_name.clone()));
        }

        let consumed = match evt.data.first().map(FirstArg::from_value) {
            Some(FirstArg::Carrier(carrier)) => {
                copy_accepted(carrier, &mut fields);
                true
            }
            _ => false,
        };

        if consumed {
            evt.data.remove(0);
        }

        fields
    }
}

/**
Whether a key can be sent as a custom field.

Any key with a leading `_` is accepted, except for `_id`, which GELF reserves.
*/
pub fn is_accepted(key: &str) -> bool {
    key.starts_with('_') && key != "_id"
}

fn copy_accepted(from: &Map<String, Value>, to: &mut Map<String, Value>) {
    for (k, v) in from {
        if is_accepted(k) {
            to.insert(k.clone(), v.clone());
        }
    }
}

enum FirstArg<'a> {
    Carrier(&'a Map<String, Value>),
    Content,
}

impl<'a> FirstArg<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Object(fields) if fields.get(GELF_MARKER) == Some(&Value::Bool(true)) => {
                FirstArg::Carrier(fields)
            }
            _ => FirstArg::Content,
        }
    }
}
