//! JSON export of a [`Graph`].
//!
//! With `sort_keys` the graph is first converted to a [`serde_json::Value`],
//! whose maps keep their keys sorted; otherwise records are written in field
//! order.

use serde::Serialize;
use serde_json::{Serializer, ser::PrettyFormatter};

use pumlgraph_core::semantic::Graph;

use crate::config::OutputConfig;

/// Serialize `graph` according to `config`.
pub fn to_string(graph: &Graph, config: &OutputConfig) -> Result<String, serde_json::Error> {
    if config.sort_keys() {
        let value = serde_json::to_value(graph)?;
        write(&value, config.indent())
    } else {
        write(graph, config.indent())
    }
}

fn write<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    if indent == 0 {
        serde_json::to_writer(&mut buffer, value)?;
    } else {
        let indent = b" ".repeat(indent);
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;
    }
    // serde_json only writes UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pumlgraph_core::semantic::{LinkDirection, LinkRecord, ObjectPlacement, ObjectRecord};

    use super::*;

    fn sample() -> Graph {
        let placement = ObjectPlacement {
            num_id: 0,
            id: "db".to_string(),
            name: "Database".to_string(),
            id_path: Vec::new(),
            name_path: Vec::new(),
            num_parent_id: None,
            parent_id: None,
            src_ref: "File a.puml, line 2, column 1".to_string(),
        };
        let properties = IndexMap::from([("Info".to_string(), "Stores data".to_string())]);
        let object = ObjectRecord::program_system(placement, properties);
        let link = LinkRecord::new(
            ("db".to_string(), Some(0)),
            ("ghost".to_string(), None),
            LinkDirection::FORWARD,
            None,
            "File a.puml, line 5, column 1".to_string(),
        );
        Graph::new(vec![object], vec![link])
    }

    #[test]
    fn test_compact_sorted() {
        let json = to_string(&sample(), &OutputConfig::new(0, true)).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("{\"links\":[{\"_1to2\":true,\"_2to1\":false,"));
        assert!(json.contains("\"num_id2\":-1"));
        assert!(json.contains("\"objects\":[{\"description\":\"Stores data\",\"env\":\"\","));
    }

    #[test]
    fn test_field_order() {
        let json = to_string(&sample(), &OutputConfig::new(0, false)).unwrap();
        assert!(json.starts_with("{\"objects\":[{\"type\":\"program_system\",\"num_id\":0,"));
        assert!(json.contains("\"parent_id\":null"));
    }

    #[test]
    fn test_indent_width() {
        let json = to_string(&Graph::default(), &OutputConfig::new(2, true)).unwrap();
        assert_eq!(json, "{\n  \"links\": [],\n  \"objects\": []\n}");
    }

    #[test]
    fn test_default_indent() {
        let json = to_string(&sample(), &OutputConfig::default()).unwrap();
        assert!(json.starts_with("{\n \"links\": [\n  {\n   \"_1to2\": true,"));
    }
}
