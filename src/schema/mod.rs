use serde_json::Value;

/// The closed set of parameter shapes the generator understands.
///
/// Anything a source fragment declares that cannot be expressed here is
/// mapped to `Opaque` by the normalizer instead of being rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Integer,
    Number,
    String,
    EnumString(Vec<String>),
    Boolean,
    Array(Box<PropertySpec>),
    Object(Vec<(String, PropertySpec)>),
    Opaque,
}

/// One parameter's shape plus its documentation payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub kind: PropertyKind,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub example: Option<Value>,
}

impl PropertySpec {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            description: None,
            default: None,
            example: None,
        }
    }
}

/// One operator type's normalized parameter schema.
///
/// Immutable once the normalizer has produced it. Invariants upheld there:
/// the discriminator property exists, is constrained to exactly one literal,
/// and is a member of `required`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorVariant {
    /// The literal value of the `type` property.
    pub discriminator: String,
    pub title: Option<String>,
    /// Declaration order is preserved; emitters iterate it as-is.
    pub properties: Vec<(String, PropertySpec)>,
    pub required: Vec<String>,
    /// Source file the fragment was scanned from.
    pub origin: std::path::PathBuf,
    /// True when the fragment came from a plural header block.
    pub multi_variant_source: bool,
}

impl OperatorVariant {
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// The fixed wiring shape shared by every program. Not derived from scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSpec {
    /// Field name, JSON schema type tag, required flag.
    pub fields: Vec<(&'static str, &'static str, bool)>,
}

impl Default for ConnectionSpec {
    fn default() -> Self {
        Self {
            fields: vec![
                ("from", "string", true),
                ("to", "string", true),
                ("fromPort", "string", false),
                ("toPort", "string", false),
            ],
        }
    }
}

/// The aggregated program schema: the operator union in source-scan order
/// plus the fixed connection shape. Built once per run, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSchema {
    pub operators: Vec<OperatorVariant>,
    pub connections: ConnectionSpec,
}

/// The fixed vocabulary of port payload types used by the engine.
///
/// Arrays whose item enum is drawn from this set get a single reusable
/// named type in the typed surface instead of a per-variant declaration.
pub const PORT_TYPES: &[&str] = &["number", "boolean", "error"];

pub fn is_port_type_vocabulary(values: &[String]) -> bool {
    !values.is_empty() && values.iter().all(|v| PORT_TYPES.contains(&v.as_str()))
}
