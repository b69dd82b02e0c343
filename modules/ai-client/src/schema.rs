use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Types the AI must return through the forced tool call.
///
/// Blanket-implemented for anything deriving `JsonSchema` + `Deserialize`.
/// `tool_parameters()` produces the function-parameters schema in the strict
/// form the API enforces: every object closed (`additionalProperties:
/// false`), every property required, and all `$ref`s inlined.
pub trait ToolSchema: JsonSchema + DeserializeOwned {
    fn tool_parameters() -> Value {
        let mut schema = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = schema
            .as_object()
            .and_then(|m| m.get("definitions"))
            .cloned()
            .unwrap_or(Value::Null);

        strictify(&mut schema, &definitions);

        if let Value::Object(map) = &mut schema {
            map.remove("definitions");
            map.remove("$schema");
        }

        schema
    }

    fn tool_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> ToolSchema for T {}

/// Single recursive pass: inline `$ref`s, collapse single-entry `allOf`
/// wrappers schemars emits around referenced types, close objects, and mark
/// every property required.
fn strictify(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get("$ref").cloned() {
                if let Some(name) = path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        strictify(value, definitions);
                        return;
                    }
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    *value = all_of.into_iter().next().unwrap();
                    strictify(value, definitions);
                    return;
                }
            }

            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(props)) = map.get("properties") {
                    let keys: Vec<Value> =
                        props.keys().map(|k| Value::String(k.clone())).collect();
                    map.insert("required".to_string(), Value::Array(keys));
                }
            }

            for (_, v) in map.iter_mut() {
                strictify(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strictify(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Verdict {
        passed: bool,
        explanation: Option<String>,
    }

    #[test]
    fn objects_are_closed_and_fully_required() {
        let schema = Verdict::tool_parameters();
        let obj = schema.as_object().unwrap();

        assert_eq!(obj.get("additionalProperties"), Some(&Value::Bool(false)));

        let required: Vec<&str> = obj["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"passed"));
        assert!(required.contains(&"explanation"));
    }

    #[test]
    fn nested_types_are_inlined() {
        #[derive(Deserialize, JsonSchema)]
        struct Inner {
            score: f32,
        }

        #[derive(Deserialize, JsonSchema)]
        struct Outer {
            inner: Inner,
        }

        let schema = Outer::tool_parameters();
        let obj = schema.as_object().unwrap();
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));

        let inner = &obj["properties"]["inner"];
        assert!(inner.get("$ref").is_none());
        assert_eq!(inner["type"], Value::String("object".to_string()));
        assert_eq!(inner["additionalProperties"], Value::Bool(false));
    }

    #[test]
    fn tool_name_is_the_type_name() {
        assert_eq!(Verdict::tool_name(), "Verdict");
    }
}
