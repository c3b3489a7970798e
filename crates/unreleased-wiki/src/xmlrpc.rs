//! Minimal XML-RPC encoding and decoding.

use std::collections::BTreeMap;
use std::fmt::Write;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::{WikiError, WikiResult};

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<string>`, also used for untyped values.
    String(String),
    /// `<int>` or `<i4>`.
    Int(i64),
    /// `<boolean>`.
    Boolean(bool),
    /// `<double>`.
    Double(f64),
    /// `<dateTime.iso8601>`, kept as text.
    DateTime(String),
    /// `<struct>`.
    Struct(BTreeMap<String, Value>),
    /// `<array>`.
    Array(Vec<Value>),
    /// `<nil/>`.
    Nil,
}

impl Value {
    /// Returns the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Unwraps a struct value.
    #[must_use]
    pub fn into_struct(self) -> Option<BTreeMap<String, Value>> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push_str("<value>");
        match self {
            Self::String(text) => {
                let _ = write!(out, "<string>{}</string>", escape(text.as_str()));
            }
            Self::Int(n) => {
                let _ = write!(out, "<int>{n}</int>");
            }
            Self::Boolean(b) => {
                let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
            }
            Self::Double(d) => {
                let _ = write!(out, "<double>{d}</double>");
            }
            Self::DateTime(text) => {
                let _ = write!(
                    out,
                    "<dateTime.iso8601>{}</dateTime.iso8601>",
                    escape(text.as_str())
                );
            }
            Self::Struct(members) => {
                out.push_str("<struct>");
                for (name, value) in members {
                    let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                    value.write_to(out);
                    out.push_str("</member>");
                }
                out.push_str("</struct>");
            }
            Self::Array(values) => {
                out.push_str("<array><data>");
                for value in values {
                    value.write_to(out);
                }
                out.push_str("</data></array>");
            }
            Self::Nil => out.push_str("<nil/>"),
        }
        out.push_str("</value>");
    }
}

/// Encodes a method call.
#[must_use]
pub fn method_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from(r#"<?xml version="1.0"?>"#);
    let _ = write!(
        out,
        "<methodCall><methodName>{}</methodName><params>",
        escape(method)
    );
    for param in params {
        out.push_str("<param>");
        param.write_to(&mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

/// A parsed element: name, child elements and direct text.
#[derive(Debug, Default)]
struct Node {
    name: String,
    children: Vec<Node>,
    text: String,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }
}

fn parse_tree(xml: &str) -> WikiResult<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack = vec![Node::default()];
    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Node {
                name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
                ..Node::default()
            }),
            Event::Empty(empty) => {
                let node = Node {
                    name: String::from_utf8_lossy(empty.local_name().as_ref()).into_owned(),
                    ..Node::default()
                };
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| WikiError::Protocol("unbalanced document".into()))?;
                let parent = stack
                    .last_mut()
                    .ok_or_else(|| WikiError::Protocol("unbalanced document".into()))?;
                parent.children.push(node);
            }
            Event::Text(text) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut document = stack
        .pop()
        .filter(|_| stack.is_empty())
        .ok_or_else(|| WikiError::Protocol("unclosed element".into()))?;
    if document.children.len() != 1 {
        return Err(WikiError::Protocol("expected a single root element".into()));
    }
    Ok(document.children.remove(0))
}

fn decode_value(node: &Node) -> WikiResult<Value> {
    let Some(typed) = node.children.first() else {
        return Ok(Value::String(node.text.clone()));
    };
    let text = typed.text.trim();
    let value = match typed.name.as_str() {
        "string" => Value::String(typed.text.clone()),
        "int" | "i4" => Value::Int(
            text.parse()
                .map_err(|_| WikiError::Protocol(format!("bad int `{text}`")))?,
        ),
        "boolean" => Value::Boolean(match text {
            "1" => true,
            "0" => false,
            _ => return Err(WikiError::Protocol(format!("bad boolean `{text}`"))),
        }),
        "double" => Value::Double(
            text.parse()
                .map_err(|_| WikiError::Protocol(format!("bad double `{text}`")))?,
        ),
        "dateTime.iso8601" => Value::DateTime(text.to_string()),
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children.iter().filter(|c| c.name == "member") {
                let name = member
                    .child("name")
                    .ok_or_else(|| WikiError::Protocol("struct member without name".into()))?;
                let value = member
                    .child("value")
                    .ok_or_else(|| WikiError::Protocol("struct member without value".into()))?;
                members.insert(name.text.clone(), decode_value(value)?);
            }
            Value::Struct(members)
        }
        "array" => {
            let values = typed
                .child("data")
                .map(|data| {
                    data.children
                        .iter()
                        .filter(|c| c.name == "value")
                        .map(decode_value)
                        .collect::<WikiResult<Vec<_>>>()
                })
                .transpose()?
                .unwrap_or_default();
            Value::Array(values)
        }
        "nil" => Value::Nil,
        other => return Err(WikiError::Protocol(format!("unsupported type `{other}`"))),
    };
    Ok(value)
}

fn fault_error(fault: &Node) -> WikiError {
    let members = fault
        .child("value")
        .and_then(|value| decode_value(value).ok())
        .and_then(Value::into_struct)
        .unwrap_or_default();
    let code = match members.get("faultCode") {
        Some(Value::Int(code)) => *code,
        _ => 0,
    };
    let message = members
        .get("faultString")
        .and_then(Value::as_str)
        .unwrap_or("unknown fault")
        .to_string();
    WikiError::Fault { code, message }
}

/// Decodes a method response into its single return value.
///
/// # Errors
///
/// Returns [`WikiError::Fault`] for a fault response, and an XML or protocol
/// error for anything that is not a method response.
pub fn parse_response(xml: &str) -> WikiResult<Value> {
    let root = parse_tree(xml)?;
    if root.name != "methodResponse" {
        return Err(WikiError::Protocol(format!(
            "unexpected root element `{}`",
            root.name
        )));
    }
    if let Some(fault) = root.child("fault") {
        return Err(fault_error(fault));
    }
    let value = root
        .child("params")
        .and_then(|params| params.child("param"))
        .and_then(|param| param.child("value"))
        .ok_or_else(|| WikiError::Protocol("response without a value".into()))?;
    decode_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_call_encoding() {
        let xml = method_call(
            "confluence1.login",
            &[
                Value::String("jenkins".to_string()),
                Value::String("a<b&c".to_string()),
            ],
        );
        assert_eq!(
            xml,
            "<?xml version=\"1.0\"?><methodCall><methodName>confluence1.login</methodName><params>\
<param><value><string>jenkins</string></value></param>\
<param><value><string>a&lt;b&amp;c</string></value></param>\
</params></methodCall>"
        );
    }

    #[test]
    fn test_struct_encoding() {
        let mut page = BTreeMap::new();
        page.insert("id".to_string(), Value::Int(42));
        page.insert("current".to_string(), Value::Boolean(true));
        page.insert("tags".to_string(), Value::Array(vec![Value::Nil]));
        let xml = method_call("m", &[Value::Struct(page)]);
        assert!(xml.contains(
            "<struct><member><name>current</name><value><boolean>1</boolean></value></member>\
<member><name>id</name><value><int>42</int></value></member>\
<member><name>tags</name><value><array><data><value><nil/></value></data></array></value></member></struct>"
        ));
    }

    #[test]
    fn test_parse_string_response() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<methodResponse>
  <params>
    <param><value><string>token-123</string></value></param>
  </params>
</methodResponse>"#;
        assert_eq!(
            parse_response(xml).unwrap(),
            Value::String("token-123".to_string())
        );
    }

    #[test]
    fn test_parse_untyped_value_is_string() {
        let xml = "<methodResponse><params><param><value>plain</value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::String("plain".into()));
    }

    #[test]
    fn test_parse_struct_response() {
        let xml = r#"<methodResponse><params><param><value><struct>
  <member><name>id</name><value><string>1234</string></value></member>
  <member><name>version</name><value><i4>7</i4></value></member>
  <member><name>content</name><value><string>h3. Old &amp; stale</string></value></member>
  <member><name>created</name><value><dateTime.iso8601>20110306T10:00:00</dateTime.iso8601></value></member>
  <member><name>ratio</name><value><double>0.5</double></value></member>
  <member><name>homePage</name><value><boolean>0</boolean></value></member>
  <member><name>labels</name><value><array><data>
    <value><string>a</string></value><value>b</value>
  </data></array></value></member>
  <member><name>parent</name><value><nil/></value></member>
</struct></value></param></params></methodResponse>"#;

        let page = parse_response(xml).unwrap().into_struct().unwrap();
        assert_eq!(page["id"], Value::String("1234".into()));
        assert_eq!(page["version"], Value::Int(7));
        assert_eq!(page["content"], Value::String("h3. Old & stale".into()));
        assert_eq!(page["created"], Value::DateTime("20110306T10:00:00".into()));
        assert_eq!(page["ratio"], Value::Double(0.5));
        assert_eq!(page["homePage"], Value::Boolean(false));
        assert_eq!(
            page["labels"],
            Value::Array(vec![Value::String("a".into()), Value::String("b".into())])
        );
        assert_eq!(page["parent"], Value::Nil);
    }

    #[test]
    fn test_parse_fault() {
        let xml = r#"<methodResponse><fault><value><struct>
  <member><name>faultCode</name><value><int>0</int></value></member>
  <member><name>faultString</name><value><string>You're not allowed to view that page</string></value></member>
</struct></value></fault></methodResponse>"#;
        match parse_response(xml) {
            Err(WikiError::Fault { code, message }) => {
                assert_eq!(code, 0);
                assert_eq!(message, "You're not allowed to view that page");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_other_documents() {
        assert!(matches!(
            parse_response("<html><body>502</body></html>"),
            Err(WikiError::Protocol(_))
        ));
        assert!(matches!(
            parse_response("<methodResponse><params></params></methodResponse>"),
            Err(WikiError::Protocol(_))
        ));
        assert!(parse_response("<methodResponse><params>").is_err());
    }

    #[test]
    fn test_round_trip_through_response() {
        let mut page = BTreeMap::new();
        page.insert("content".to_string(), Value::String("| a | b |\n".to_string()));
        let call = method_call("m", &[Value::Struct(page.clone())]);
        let response = call
            .replace("<methodCall><methodName>m</methodName>", "<methodResponse>")
            .replace("</methodCall>", "</methodResponse>");
        assert_eq!(parse_response(&response).unwrap(), Value::Struct(page));
    }
}
