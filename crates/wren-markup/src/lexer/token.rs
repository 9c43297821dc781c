use core::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// The kind of a markup token.
///
/// `Display` renders the conventional `T_*` names so token dumps stay
/// compact, e.g. `T_ELEM_START`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// `<` opening a start tag. Carries no value.
    #[strum(serialize = "T_ELEM_START")]
    ElemStart,
    /// Namespace prefix of an element name (`foo` in `<foo:bar>`).
    #[strum(serialize = "T_ELEM_NS")]
    ElemNs,
    /// Local name of an element.
    #[strum(serialize = "T_ELEM_NAME")]
    ElemName,
    /// Namespace prefix of an attribute name.
    #[strum(serialize = "T_ATTR_NS")]
    AttrNs,
    /// Local name of an attribute.
    #[strum(serialize = "T_ATTR")]
    Attr,
    /// Quoted or unquoted value of an attribute, or a quoted doctype identifier.
    #[strum(serialize = "T_STRING")]
    String,
    /// Closes an element: `/>` of an empty-element tag, or a whole `</name>`.
    #[strum(serialize = "T_ELEM_END")]
    ElemEnd,
    /// A run of character data.
    #[strum(serialize = "T_TEXT")]
    Text,
    /// Comment body, without `<!--` and `-->`.
    #[strum(serialize = "T_COMMENT")]
    Comment,
    /// CDATA section body, without `<![CDATA[` and `]]>`.
    #[strum(serialize = "T_CDATA")]
    Cdata,
    /// `<!DOCTYPE` opener.
    #[strum(serialize = "T_DOCTYPE_START")]
    DoctypeStart,
    /// Root element name of a doctype.
    #[strum(serialize = "T_DOCTYPE_NAME")]
    DoctypeName,
    /// `PUBLIC` or `SYSTEM` keyword of a doctype.
    #[strum(serialize = "T_DOCTYPE_TYPE")]
    DoctypeType,
    /// Internal subset of a doctype, without the brackets.
    #[strum(serialize = "T_DOCTYPE_INLINE")]
    DoctypeInline,
    /// `>` closing a doctype.
    #[strum(serialize = "T_DOCTYPE_END")]
    DoctypeEnd,
    /// `<?xml` opener.
    #[strum(serialize = "T_XML_DECL_START")]
    XmlDeclStart,
    /// `?>` closing an XML declaration.
    #[strum(serialize = "T_XML_DECL_END")]
    XmlDeclEnd,
    /// `<?` opening a processing instruction.
    #[strum(serialize = "T_PROC_INS_START")]
    ProcInsStart,
    /// Target name of a processing instruction.
    #[strum(serialize = "T_PROC_INS_NAME")]
    ProcInsName,
    /// Body of a processing instruction.
    #[strum(serialize = "T_PROC_INS_BODY")]
    ProcInsBody,
    /// `?>` closing a processing instruction.
    #[strum(serialize = "T_PROC_INS_END")]
    ProcInsEnd,
}

/// A single markup token.
///
/// Tokens are produced once, consumed in order by a tree builder, and never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What was lexed.
    pub kind: TokenKind,
    /// Payload, for kinds that carry one (names, text, comment bodies, ...).
    pub value: Option<String>,
    /// 1-based line on which the token starts.
    pub line: usize,
}

impl Token {
    /// Create a token with a value.
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            line,
        }
    }

    /// Create a marker token that carries no value.
    #[must_use]
    pub const fn marker(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            value: None,
            line,
        }
    }

    /// The payload as a string slice, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "[{}, {value:?}, {}]", self.kind, self.line),
            None => write!(f, "[{}, nil, {}]", self.kind, self.line),
        }
    }
}
