//! Element abstraction consumed from the rendering layer.
//!
//! The rendering layer hands the validator concrete elements. Each element is
//! classified once, at construction, into an [`ElementKind`]; everything the
//! validator needs to know about a kind lives in its [`Capabilities`] row.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// ============================================================================
// ELEMENT KIND
// ============================================================================

/// Classification of an interactive element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// `<input>`
    Input,
    /// `<textarea>`
    TextArea,
    /// `<select>`, value is the list of selected option values
    Select,
    /// `<meter>`
    Meter,
    /// `<output>`
    Output,
    /// `<progress>`
    Progress,
    /// `<canvas>`, used by drawing-based custom inputs
    Canvas,
    /// Anything else (containers, buttons, ...)
    Other,
}

/// What the validator may do with an element of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The element yields string values through [`Element::values`].
    pub has_value: bool,
    /// The element is applicable for validation even without a value.
    pub always_applicable: bool,
    /// Blurring the element triggers validation.
    pub blurrable: bool,
    /// The element is tracked by an area at all.
    pub validatable: bool,
}

impl ElementKind {
    /// Classifies an element by its tag name (case-insensitive).
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "input" => Self::Input,
            "textarea" => Self::TextArea,
            "select" => Self::Select,
            "meter" => Self::Meter,
            "output" => Self::Output,
            "progress" => Self::Progress,
            "canvas" => Self::Canvas,
            _ => Self::Other,
        }
    }

    /// Capability row for this kind.
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Input | Self::TextArea | Self::Select => Capabilities {
                has_value: true,
                always_applicable: false,
                blurrable: true,
                validatable: true,
            },
            Self::Meter | Self::Output | Self::Progress => Capabilities {
                has_value: true,
                always_applicable: false,
                blurrable: false,
                validatable: true,
            },
            Self::Canvas => Capabilities {
                has_value: false,
                always_applicable: true,
                blurrable: false,
                validatable: true,
            },
            Self::Other => Capabilities {
                has_value: false,
                always_applicable: false,
                blurrable: false,
                validatable: false,
            },
        }
    }

    /// Input and textarea: the free-text kinds.
    pub const fn is_input_like(self) -> bool {
        matches!(self, Self::Input | Self::TextArea)
    }

    /// Meter, output and progress: read-only numeric displays.
    pub const fn is_gauge_like(self) -> bool {
        matches!(self, Self::Meter | Self::Output | Self::Progress)
    }
}

// ============================================================================
// INPUT TYPE
// ============================================================================

/// The `type` attribute of an input, as far as the built-in rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Free text (the default)
    #[default]
    Text,
    /// Checkbox
    Checkbox,
    /// Radio button
    Radio,
    /// Any other input type (number, url, email, ...)
    Other,
}

impl InputType {
    /// Parses a `type` attribute value.
    pub fn from_attr(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "" | "text" => Self::Text,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            _ => Self::Other,
        }
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

/// Shared handle to an element. Identity is pointer identity.
pub type ElementRef = Arc<Element>;

/// Host-supplied event listener.
pub type Listener = Arc<dyn Fn(&Element) + Send + Sync>;

#[derive(Debug, Clone, Default)]
struct ElementState {
    value: String,
    selected: Vec<String>,
    checked: bool,
}

/// An interactive element as seen by the validator.
///
/// Static facts (kind, name, input type, listeners) are fixed at
/// construction. The value side is mutable so the host can mirror user input.
pub struct Element {
    kind: ElementKind,
    input_type: InputType,
    name: Option<String>,
    state: RwLock<ElementState>,
    on_blur: Option<Listener>,
    on_change: Option<Listener>,
}

impl Element {
    /// Creates an element of the given kind with no name and no value.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            input_type: InputType::default(),
            name: None,
            state: RwLock::new(ElementState::default()),
            on_blur: None,
            on_change: None,
        }
    }

    /// `<input>`
    pub fn input() -> Self {
        Self::new(ElementKind::Input)
    }

    /// `<textarea>`
    pub fn textarea() -> Self {
        Self::new(ElementKind::TextArea)
    }

    /// `<select>`
    pub fn select() -> Self {
        Self::new(ElementKind::Select)
    }

    /// `<canvas>`
    pub fn canvas() -> Self {
        Self::new(ElementKind::Canvas)
    }

    /// `<input type="checkbox">`
    pub fn checkbox() -> Self {
        Self::input().with_type(InputType::Checkbox)
    }

    /// `<input type="radio">`
    pub fn radio() -> Self {
        Self::input().with_type(InputType::Radio)
    }

    /// Sets the `name` attribute.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the input type.
    pub fn with_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Sets the initial value.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        self.state.write().value = value.into();
        self
    }

    /// Sets the initially selected option values (select only).
    pub fn with_selected<I, S>(self, selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.write().selected = selected.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initial checked flag.
    pub fn with_checked(self, checked: bool) -> Self {
        self.state.write().checked = checked;
        self
    }

    /// Installs the host's blur listener.
    pub fn on_blur(mut self, listener: impl Fn(&Element) + Send + Sync + 'static) -> Self {
        self.on_blur = Some(Arc::new(listener));
        self
    }

    /// Installs the host's change listener.
    pub fn on_change(mut self, listener: impl Fn(&Element) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(listener));
        self
    }

    /// Wraps the element into a shared handle.
    pub fn shared(self) -> ElementRef {
        Arc::new(self)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    /// The `name` attribute, if set and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    pub fn is_checkbox(&self) -> bool {
        self.kind == ElementKind::Input && self.input_type == InputType::Checkbox
    }

    pub fn is_radio(&self) -> bool {
        self.kind == ElementKind::Input && self.input_type == InputType::Radio
    }

    /// Raw value attribute.
    pub fn value(&self) -> String {
        self.state.read().value.clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.state.write().value = value.into();
    }

    /// Raw selected option values.
    pub fn selected(&self) -> Vec<String> {
        self.state.read().selected.clone()
    }

    pub fn set_selected<I, S>(&self, selected: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.write().selected = selected.into_iter().map(Into::into).collect();
    }

    pub fn is_checked(&self) -> bool {
        self.state.read().checked
    }

    pub fn set_checked(&self, checked: bool) {
        self.state.write().checked = checked;
    }

    /// Values under the extraction policy.
    ///
    /// Value kinds yield their non-empty value; a select yields every
    /// non-empty selected option value; all other kinds yield nothing.
    pub fn values(&self) -> Vec<String> {
        let state = self.state.read();
        match self.kind {
            ElementKind::Select => state
                .selected
                .iter()
                .filter(|value| !value.is_empty())
                .cloned()
                .collect(),
            kind if kind.capabilities().has_value => {
                if state.value.is_empty() {
                    Vec::new()
                } else {
                    vec![state.value.clone()]
                }
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn fire_blur(&self) {
        if let Some(listener) = &self.on_blur {
            listener(self);
        }
    }

    pub(crate) fn fire_change(&self) {
        if let Some(listener) = &self.on_change {
            listener(self);
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("input_type", &self.input_type)
            .field("name", &self.name)
            .field("value", &state.value)
            .field("selected", &state.selected)
            .field("checked", &state.checked)
            .finish()
    }
}

/// Collects the values of every element, in element order.
pub fn values_of(elements: &[ElementRef]) -> Vec<String> {
    elements.iter().flat_map(|element| element.values()).collect()
}

/// Whether `needle` is tracked in `elements` (by identity).
pub(crate) fn contains(elements: &[ElementRef], needle: &ElementRef) -> bool {
    elements.iter().any(|element| Arc::ptr_eq(element, needle))
}
