//! Schema generation utilities.
//!
//! Strict structured output (and strict tool parameters) only accept closed object
//! schemas: every object lists all of its properties as required and forbids additional
//! properties. [`make_strict`] rewrites a schema into that shape.

use schemars::gen::SchemaSettings;
use serde_json::{json, Map, Value};

/// Builder for closed object schemas; the result always forbids additional properties.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    properties: Vec<(String, Value)>,
    required: Vec<String>,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Add a property and mark it required.
    pub fn required_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.push((name, schema));
        self
    }

    pub fn build(self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), json!("object"));

        let mut properties = Map::new();
        for (name, schema) in self.properties {
            properties.insert(name, schema);
        }
        map.insert("properties".into(), properties.into());

        if !self.required.is_empty() {
            map.insert("required".into(), self.required.into());
        }

        map.insert("additionalProperties".into(), json!(false));

        map.into()
    }
}

pub fn schema_from_type_name(type_name: &str) -> Value {
    match type_name {
        "string" => json!({"type": "string"}),
        "integer" => json!({"type": "integer"}),
        "number" => json!({"type": "number"}),
        "boolean" => json!({"type": "boolean"}),
        "array" => json!({"type": "array"}),
        "object" => json!({"type": "object"}),
        "null" => json!({"type": "null"}),
        _ => json!({"type": "object"}),
    }
}

/// JSON schema for `T` with every sub-schema inlined (no `$ref`).
pub fn json_schema_from_type<T: schemars::JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.option_add_null_type = true;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<T>();
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({}))
}

/// [`json_schema_from_type`] normalized with [`make_strict`].
pub fn strict_schema_from_type<T: schemars::JsonSchema>() -> Value {
    let mut schema = json_schema_from_type::<T>();
    make_strict(&mut schema);
    schema
}

/// Close every object schema and drop keywords strict mode rejects.
pub fn make_strict(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    map.remove("$schema");
    map.remove("definitions");
    if is_numeric(map.get("type")) {
        map.remove("format");
    }

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for sub in props.values_mut() {
            make_strict(sub);
        }
        let names: Vec<Value> = props.keys().cloned().map(Value::String).collect();
        map.insert("required".into(), Value::Array(names));
        map.insert("additionalProperties".into(), json!(false));
    }

    match map.get_mut("items") {
        Some(Value::Array(items)) => items.iter_mut().for_each(make_strict),
        Some(items) => make_strict(items),
        None => {}
    }

    for key in ["anyOf", "oneOf", "allOf"] {
        if let Some(Value::Array(variants)) = map.get_mut(key) {
            variants.iter_mut().for_each(make_strict);
        }
    }
}

fn is_numeric(ty: Option<&Value>) -> bool {
    let numeric = |s: &str| s == "number" || s == "integer";
    match ty {
        Some(Value::String(s)) => numeric(s),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(numeric),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Change {
        field: String,
        new_value: String,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Modify {
        /// Description to identify the existing event
        event_identifier: String,
        changes: Vec<Change>,
        duration_minutes: i64,
        link: Option<String>,
    }

    #[test]
    fn test_schema_generator_basic() {
        let schema = SchemaGenerator::new()
            .add_property("name", json!({"type": "string"}))
            .add_property("age", json!({"type": "integer"}))
            .build();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["additionalProperties"], false);
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_schema_generator_required_property() {
        let schema = SchemaGenerator::new()
            .required_property("question", schema_from_type_name("string"))
            .build();
        assert_eq!(schema["required"], json!(["question"]));
    }

    #[test]
    fn strict_schema_closes_nested_objects() {
        let schema = strict_schema_from_type::<Modify>();
        assert!(schema.get("$schema").is_none());
        assert_eq!(schema["additionalProperties"], false);

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert!(required.contains(&json!("link")));

        let item = &schema["properties"]["changes"]["items"];
        assert_eq!(item["type"], "object");
        assert_eq!(item["additionalProperties"], false);
        assert_eq!(item["required"], json!(["field", "new_value"]));

        assert!(schema["properties"]["duration_minutes"].get("format").is_none());
        assert_eq!(
            schema["properties"]["event_identifier"]["description"],
            "Description to identify the existing event"
        );
    }

    #[test]
    fn optional_fields_accept_null() {
        let schema = strict_schema_from_type::<Modify>();
        let ty = &schema["properties"]["link"]["type"];
        assert!(ty.as_array().unwrap().contains(&json!("null")));
    }
}
