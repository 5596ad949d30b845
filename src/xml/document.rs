use super::{Query, Step, Target};
use crate::StrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Holds one element of the parameter document
#[derive(Clone, Debug, PartialEq)]
pub struct XmlNode {
    /// Element name
    pub name: String,

    /// Attributes (name, value) in document order
    pub attributes: Vec<(String, String)>,

    /// Concatenated text content (trimmed pieces)
    pub text: String,

    /// Child elements in document order
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Returns the value of an attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the children passing a location step
    fn matching_children<'a>(&'a self, step: &Step) -> Vec<&'a XmlNode> {
        let candidates = self.children.iter().filter(|child| {
            child.name == step.name
                && step
                    .tests
                    .iter()
                    .all(|(key, value)| child.attribute(key) == Some(value.as_str()))
        });
        match step.position {
            Some(p) if p >= 1 => candidates.skip(p - 1).take(1).collect(),
            Some(_) => Vec::new(),
            None => candidates.collect(),
        }
    }

    /// Collects this node and all its descendants in document order
    fn collect_all<'a>(&'a self, out: &mut Vec<&'a XmlNode>) {
        out.push(self);
        for child in &self.children {
            child.collect_all(out);
        }
    }
}

/// Holds the parameter document written by the graphical front-end
#[derive(Clone, Debug)]
pub struct Document {
    /// The root element
    pub root: XmlNode,
}

impl Document {
    /// Parses a document from an XML string
    pub fn parse(xml: &str) -> Result<Self, StrError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(new_node(e)?),
                Ok(Event::Empty(ref e)) => {
                    let node = new_node(e)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::End(_)) => {
                    let node = stack.pop().ok_or("XML document has an unbalanced end tag")?;
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(top) = stack.last_mut() {
                        let raw = std::str::from_utf8(&**e).map_err(|_| "XML text is not valid UTF-8")?;
                        let text = quick_xml::escape::unescape(raw).map_err(|_| "cannot unescape XML text")?;
                        append_text(top, &text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(top) = stack.last_mut() {
                        let raw = std::str::from_utf8(&**e).map_err(|_| "XML text is not valid UTF-8")?;
                        append_text(top, raw);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => (),
                Err(_) => return Err("cannot parse XML document"),
            }
        }
        if !stack.is_empty() {
            return Err("XML document ended before all elements were closed");
        }
        let root = root.ok_or("XML document has no root element")?;
        Ok(Document { root })
    }

    /// Reads and parses an XML file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_file<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let xml = fs::read_to_string(path).map_err(|_| "cannot read XML file")?;
        Document::parse(&xml)
    }

    /// Returns the elements addressed by the steps of a query (the target is ignored)
    pub fn select<'a>(&'a self, query: &Query) -> Vec<&'a XmlNode> {
        if query.steps.is_empty() {
            return Vec::new();
        }
        let mut current: Vec<&XmlNode> = vec![&self.root];
        for (i, step) in query.steps.iter().enumerate() {
            let parents = if i == 0 && query.anywhere {
                let mut all = Vec::new();
                self.root.collect_all(&mut all);
                all
            } else {
                current
            };
            current = parents.into_iter().flat_map(|p| p.matching_children(step)).collect();
        }
        current
    }

    /// Returns the number of elements addressed by a query
    pub fn count(&self, query: &Query) -> usize {
        self.select(query).len()
    }

    /// Returns the first value of the attribute addressed by a query
    ///
    /// Returns None if the query does not end on an attribute.
    pub fn get_attribute(&self, query: &Query) -> Option<String> {
        match query.target() {
            Target::Attribute(name) => self
                .select(query)
                .iter()
                .find_map(|node| node.attribute(name))
                .map(|value| value.to_string()),
            _ => None,
        }
    }

    /// Returns the trimmed text of the first element addressed by a query
    ///
    /// Returns None if the text is empty or if the query ends on an attribute.
    pub fn get_text(&self, query: &Query) -> Option<String> {
        if let Target::Attribute(_) = query.target() {
            return None;
        }
        let nodes = self.select(query);
        let text = nodes.first()?.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Returns the real number addressed by a query
    pub fn get_double(&self, query: &Query) -> Result<Option<f64>, StrError> {
        match self.get_text(query) {
            Some(text) => text.parse().map(Some).map_err(|_| "cannot parse real number"),
            None => Ok(None),
        }
    }

    /// Returns the integer number addressed by a query
    pub fn get_int(&self, query: &Query) -> Result<Option<i32>, StrError> {
        match self.get_text(query) {
            Some(text) => text.parse().map(Some).map_err(|_| "cannot parse integer number"),
            None => Ok(None),
        }
    }

    /// Returns the on/off status addressed by a query ending on a status attribute
    pub fn get_status(&self, query: &Query) -> Result<Option<bool>, StrError> {
        match self.get_attribute(query).as_deref() {
            Some("on") => Ok(Some(true)),
            Some("off") => Ok(Some(false)),
            Some(_) => Err("status attribute must be 'on' or 'off'"),
            None => Ok(None),
        }
    }
}

/// Allocates a node from a start (or empty) tag
fn new_node(e: &BytesStart) -> Result<XmlNode, StrError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|_| "XML element name is not valid UTF-8")?
        .to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|_| "cannot parse XML attribute")?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| "XML attribute name is not valid UTF-8")?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|_| "cannot unescape XML attribute")?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlNode {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

/// Appends a finished node to its parent or makes it the root
fn attach(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) -> Result<(), StrError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_some() {
                return Err("XML document has more than one root element");
            }
            *root = Some(node);
        }
    }
    Ok(())
}

/// Appends a trimmed text piece, separated from the previous piece by one space
fn append_text(node: &mut XmlNode, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    if !node.text.is_empty() {
        node.text.push(' ');
    }
    node.text.push_str(piece);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::xml::Query;
    use crate::StrError;

    const CASE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Code_Saturne_GUI case="test" version="1.0">
  <thermophysical_models>
    <turbulence model="k-epsilon">
      <gravity_terms status="on"/>
      <scale_model>1</scale_model>
    </turbulence>
  </thermophysical_models>
  <boundary_conditions>
    <boundary label="in1" name="1" nature="inlet">inlet_group</boundary>
    <boundary label="wall1" name="2" nature="wall">walls &amp; fins</boundary>
    <inlet label="in1">
      <velocity_pressure choice="norm">
        <norm> 2.5 </norm>
      </velocity_pressure>
    </inlet>
  </boundary_conditions>
  <analysis_control>
    <output>
      <listing_printing_frequency>abc</listing_printing_frequency>
    </output>
  </analysis_control>
</Code_Saturne_GUI>
"#;

    #[test]
    fn parse_and_select_work() -> Result<(), StrError> {
        let doc = Document::parse(CASE)?;
        assert_eq!(doc.root.name, "Code_Saturne_GUI");
        assert_eq!(doc.root.attribute("case"), Some("test"));
        let q = Query::root().elements(&["boundary_conditions", "boundary"]);
        assert_eq!(doc.count(&q), 2);
        let q = Query::root()
            .element("boundary_conditions")
            .element_num("boundary", 2)
            .attribute("label");
        assert_eq!(doc.get_attribute(&q), Some("wall1".to_string()));
        let q = Query::root()
            .element("boundary_conditions")
            .element_num("boundary", 3)
            .attribute("label");
        assert_eq!(doc.get_attribute(&q), None);
        let q = Query::root()
            .elements(&["boundary_conditions", "boundary"])
            .test_attribute("label", "wall1")
            .text();
        assert_eq!(doc.get_text(&q), Some("walls & fins".to_string()));
        Ok(())
    }

    #[test]
    fn typed_accessors_work() -> Result<(), StrError> {
        let doc = Document::parse(CASE)?;
        let base = Query::root().elements(&["thermophysical_models", "turbulence"]);
        assert_eq!(
            doc.get_attribute(&base.clone().attribute("model")),
            Some("k-epsilon".to_string())
        );
        let q = base.clone().element("gravity_terms").attribute("status");
        assert_eq!(doc.get_status(&q)?, Some(true));
        let q = base.clone().element("scale_model").text();
        assert_eq!(doc.get_int(&q)?, Some(1));
        let q = base.element("mixing_length_scale").text();
        assert_eq!(doc.get_double(&q)?, None);
        let q = Query::anywhere().element("norm").text();
        assert_eq!(doc.get_double(&q)?, Some(2.5));
        let q = Query::anywhere().element("listing_printing_frequency").text();
        assert_eq!(doc.get_int(&q).err(), Some("cannot parse integer number"));
        assert_eq!(doc.get_double(&q).err(), Some("cannot parse real number"));
        Ok(())
    }

    #[test]
    fn anywhere_works() -> Result<(), StrError> {
        let doc = Document::parse(CASE)?;
        let q = Query::anywhere().element("velocity_pressure").attribute("choice");
        assert_eq!(doc.get_attribute(&q), Some("norm".to_string()));
        let q = Query::anywhere().element("boundary").test_attribute("nature", "wall");
        assert_eq!(doc.count(&q), 1);
        assert_eq!(doc.count(&Query::root()), 0);
        Ok(())
    }

    #[test]
    fn mixed_text_works() -> Result<(), StrError> {
        let doc = Document::parse(
            "<case><boundary label=\"w\">walls<comment/>or\n  <![CDATA[fins]]>\n  <comment>x</comment> 7 </boundary></case>",
        )?;
        let q = Query::root().element("boundary").text();
        assert_eq!(doc.get_text(&q), Some("walls or fins 7".to_string()));
        Ok(())
    }

    #[test]
    fn catch_some_errors() {
        assert_eq!(
            Document::parse("<a><b></a>").err(),
            Some("cannot parse XML document")
        );
        assert_eq!(
            Document::parse("<a></a><b/>").err(),
            Some("XML document has more than one root element")
        );
        assert_eq!(Document::parse("").err(), Some("XML document has no root element"));
        assert!(Document::parse("<a><b>").is_err());
        assert_eq!(
            Document::read_file("/tmp/fvbc/__not_found__.xml").err(),
            Some("cannot read XML file")
        );
    }
}
