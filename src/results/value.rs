use indexmap::IndexMap;

/// One extracted output.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Scalar(f64),
    /// A name that was assigned but whose literal did not parse.
    Missing,
    Text(String),
    Column(Vec<f64>),
    Table(Vec<Vec<f64>>),
}

impl ResultValue {
    /// Value for a log assignment literal: a scalar, or `Missing` when the
    /// literal is not a float.
    pub fn from_log_literal(raw: &str) -> Self {
        match parse_float(raw) {
            Some(value) => ResultValue::Scalar(value),
            None => ResultValue::Missing,
        }
    }

    /// Value for a standalone text artifact: a scalar when the whole content
    /// is a float, else the content itself.
    pub fn from_text(content: &str) -> Self {
        let content = content.trim();
        match parse_float(content) {
            Some(value) => ResultValue::Scalar(value),
            None => ResultValue::Text(content.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResultValue::Scalar(_) => "scalar",
            ResultValue::Missing => "missing",
            ResultValue::Text(_) => "text",
            ResultValue::Column(_) => "column",
            ResultValue::Table(_) => "table",
        }
    }
}

/// Parses a float the way solver outputs are written: surrounding whitespace
/// is ignored, `nan`/`inf`/`infinity` are accepted in any case.
pub fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Insertion-ordered mapping from output name to value.
///
/// Overwriting an existing key replaces its value in place, so the key keeps
/// the position of its first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: IndexMap<String, ResultValue>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `name`, returning the value it replaced.
    pub fn insert<S: Into<String>>(&mut self, name: S, value: ResultValue) -> Option<ResultValue> {
        self.entries.insert(name.into(), value)
    }

    /// Inserts every entry of `other` in its order, later values winning.
    pub fn extend(&mut self, other: ResultSet) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, name: &str) -> Option<&ResultValue> {
        self.entries.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, ResultValue)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (S, ResultValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}
