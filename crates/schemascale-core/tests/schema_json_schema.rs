use schemars::schema_for;
use schemascale_core::Schema;

#[test]
fn json_schema_describes_wire_keys() {
    let generated = schema_for!(Schema);
    let json = serde_json::to_value(&generated).expect("serialize generated schema");

    let required = json
        .get("required")
        .and_then(|value| value.as_array())
        .expect("required list");
    for key in ["dataset", "db_id", "schema"] {
        assert!(
            required.iter().any(|value| value == key),
            "missing required key {key}"
        );
    }

    let column = json
        .pointer("/definitions/Column/properties")
        .expect("column definition");
    for key in ["name", "type", "typegroup", "notnull", "pk"] {
        assert!(column.get(key).is_some(), "missing column key {key}");
    }

    let fk = json
        .pointer("/definitions/ForeignKey/properties")
        .expect("foreign key definition");
    for key in ["sourceTable", "sourceColumn", "targetColumn"] {
        assert!(fk.get(key).is_some(), "missing foreign key key {key}");
    }
}
