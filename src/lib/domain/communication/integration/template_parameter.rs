//! Email template parameter

/// A substitution tag and the values that replace it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailTemplateParameter {
    replacement_tag: String,
    values: Vec<String>,
}

impl EmailTemplateParameter {
    /// Creates a new template parameter
    pub fn new<I, S>(replacement_tag: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replacement_tag: replacement_tag.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The placeholder this parameter replaces
    pub fn replacement_tag(&self) -> &str {
        &self.replacement_tag
    }

    /// The replacement values, in order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}
