use std::fmt;

/// Holds one location step of a query
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Step {
    /// Element name
    pub(crate) name: String,

    /// Attribute tests (name, value) that the element must pass
    pub(crate) tests: Vec<(String, String)>,

    /// 1-based position among the same-named siblings passing the tests
    pub(crate) position: Option<usize>,
}

/// Defines what a query addresses at the end of its steps
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    /// The elements themselves
    Node,

    /// An attribute of the elements
    Attribute(String),

    /// The text content of the elements
    Text,
}

/// Implements a typed path query into the parameter document
///
/// A query is a list of element steps starting below the root element, either at the first
/// level ([Query::root]) or at any depth ([Query::anywhere]). The last step may carry attribute
/// tests and a position. A query ends by addressing the elements, one of their attributes, or
/// their text.
///
/// # Examples
///
/// ```
/// use fvbc::xml::Query;
///
/// let q = Query::root()
///     .elements(&["boundary_conditions", "inlet"])
///     .test_attribute("label", "in1")
///     .element("velocity_pressure")
///     .attribute("choice");
/// assert_eq!(
///     format!("{}", q),
///     "/boundary_conditions/inlet[@label='in1']/velocity_pressure/@choice"
/// );
///
/// let q = Query::anywhere().element_num("probe_recording", 2).attribute("name");
/// assert_eq!(format!("{}", q), "//probe_recording[2]/@name");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub(crate) anywhere: bool,
    pub(crate) steps: Vec<Step>,
    pub(crate) target: Target,
}

impl Query {
    /// Starts a query at the children of the root element
    pub fn root() -> Self {
        Query {
            anywhere: false,
            steps: Vec::new(),
            target: Target::Node,
        }
    }

    /// Starts a query whose first step may match at any depth
    pub fn anywhere() -> Self {
        Query {
            anywhere: true,
            steps: Vec::new(),
            target: Target::Node,
        }
    }

    /// Appends an element step
    pub fn element(mut self, name: &str) -> Self {
        self.steps.push(Step {
            name: name.to_string(),
            tests: Vec::new(),
            position: None,
        });
        self
    }

    /// Appends several element steps
    pub fn elements(mut self, names: &[&str]) -> Self {
        for name in names {
            self = self.element(name);
        }
        self
    }

    /// Appends an element step selecting the `num`-th element (1-based)
    pub fn element_num(mut self, name: &str, num: usize) -> Self {
        self.steps.push(Step {
            name: name.to_string(),
            tests: Vec::new(),
            position: Some(num),
        });
        self
    }

    /// Requires the last element to have an attribute with the given value
    ///
    /// **Note:** This has no effect on a query without steps.
    pub fn test_attribute(mut self, attribute: &str, value: &str) -> Self {
        if let Some(step) = self.steps.last_mut() {
            step.tests.push((attribute.to_string(), value.to_string()));
        }
        self
    }

    /// Ends the query on an attribute
    pub fn attribute(mut self, name: &str) -> Self {
        self.target = Target::Attribute(name.to_string());
        self
    }

    /// Ends the query on the text content
    pub fn text(mut self) -> Self {
        self.target = Target::Text;
        self
    }

    /// Returns what the query addresses
    pub fn target(&self) -> &Target {
        &self.target
    }
}

impl fmt::Display for Query {
    /// Renders the equivalent XPath expression
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anywhere {
            write!(f, "/")?;
        }
        for step in &self.steps {
            write!(f, "/{}", step.name)?;
            for (attribute, value) in &step.tests {
                write!(f, "[@{}='{}']", attribute, value)?;
            }
            if let Some(p) = step.position {
                write!(f, "[{}]", p)?;
            }
        }
        match &self.target {
            Target::Node => Ok(()),
            Target::Attribute(name) => write!(f, "/@{}", name),
            Target::Text => write!(f, "/text()"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
