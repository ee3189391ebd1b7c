/// A decoded property value.
///
/// The interpreter treats these as opaque payloads: it only ever branches on
/// presence, truthiness and a handful of scalar extractions, and hands the
/// value through to the toolkit otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    /// A plain, non-translatable string.
    Str(String),
    /// A translatable string, resolved through the translation context at
    /// load time. Counts as "not a plain string" for priming decisions.
    Tr(String),
    /// A qualified enumerator name, e.g. `Qt::Horizontal`.
    Enum(String),
    /// An OR-ed flag set, e.g. `Qt::AlignLeft|Qt::AlignVCenter`.
    Set(String),
    Size(i32, i32),
    /// An icon resource path.
    Icon(String),
    List(Vec<Value>),
}

impl Value {
    /// The falsy set: false, zero, and empty strings/sets/lists.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Double(d) => *d != 0.0,
            Value::Str(s) | Value::Tr(s) | Value::Enum(s) | Value::Set(s) | Value::Icon(s) => {
                !s.is_empty()
            }
            Value::Size(..) => true,
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String content of plain and translatable strings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Tr(s) => Some(s),
            _ => None,
        }
    }

    /// Whether applying this value requires the translation context.
    pub fn is_translatable(&self) -> bool {
        matches!(self, Value::Tr(_))
    }

    /// Compares against a qualified enumerator name, tolerating a missing
    /// namespace prefix on either side.
    pub fn matches_enum(&self, qualified: &str) -> bool {
        match self {
            Value::Enum(s) => {
                let tail = |v: &str| v.rsplit("::").next().unwrap_or(v).to_string();
                s == qualified || tail(s) == tail(qualified)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Tr(String::new()).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::Size(0, 0).is_truthy());
        assert!(Value::Enum("Qt::Checked".into()).is_truthy());
    }

    #[test]
    fn enum_matching_ignores_namespace() {
        let v = Value::Enum("Qt::Horizontal".into());
        assert!(v.matches_enum("Qt::Horizontal"));
        assert!(v.matches_enum("Horizontal"));
        assert!(!v.matches_enum("Qt::Vertical"));
        assert!(!Value::Str("Qt::Horizontal".into()).matches_enum("Qt::Horizontal"));
    }
}
