//! Value cells: the typed scalar slots bound to registered arguments.
//!
//! A cell owns the declared default, the constant used by store-constant
//! actions, and an optional validation predicate. The live value sits behind a
//! [`Handle`] shared with whoever registered the argument, so results are read
//! straight from the handle after a parse pass.
//!
//! Handles are single-writer: they are `Rc<RefCell<_>>`, not `Send`, and a
//! parser tree must only be driven by one parse pass at a time.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::argument::Action;
use crate::error::ValueError;

/// The closed set of scalar kinds an argument can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Str,
    Bool,
}

impl ValueKind {
    pub fn as_label(&self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Str => "string",
            ValueKind::Bool => "bool",
        }
    }

    /// Whether an action can operate on cells of this kind.
    pub fn supports(self, action: Action) -> bool {
        match action {
            Action::StoreValue | Action::StoreConst => true,
            Action::StoreTrue | Action::StoreFalse => self == ValueKind::Bool,
            Action::Increment => self == ValueKind::Int,
            Action::Help => self == ValueKind::Str,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Read/write handle to a live argument value.
///
/// Cloning a handle shares the same slot.
pub struct Handle<T>(Rc<RefCell<T>>);

impl<T> Handle<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Overwrite the current value.
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl<T: Clone> Handle<T> {
    /// Copy of the current value.
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&*self.0.borrow()).finish()
    }
}

/// Post-parse predicate; returning `false` rejects the value.
pub type Validator<T> = Box<dyn Fn(&T) -> bool>;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for String {}
    impl Sealed for bool {}
}

/// A scalar type a [`ValueCell`] can hold. Implemented for `i64`, `String`
/// and `bool` only.
pub trait Scalar: sealed::Sealed + Clone + Default + fmt::Debug + 'static {
    const KIND: ValueKind;

    /// Coerce raw token text into a value.
    fn parse_text(raw: &str) -> Result<Self, ValueError>;

    /// Display text of a value.
    fn render(&self) -> String;

    /// Default forced by a flag action (store-true defaults to `false`, ...).
    fn flag_default(_action: Action) -> Option<Self> {
        None
    }

    #[doc(hidden)]
    fn into_cell(cell: TypedCell<Self>) -> ValueCell;
}

impl Scalar for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn parse_text(raw: &str) -> Result<Self, ValueError> {
        parse_int_literal(raw).ok_or_else(|| ValueError::InvalidFormat {
            value: raw.to_string(),
            expected: "an integer",
        })
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn into_cell(cell: TypedCell<Self>) -> ValueCell {
        ValueCell::Int(cell)
    }
}

impl Scalar for String {
    const KIND: ValueKind = ValueKind::Str;

    fn parse_text(raw: &str) -> Result<Self, ValueError> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn into_cell(cell: TypedCell<Self>) -> ValueCell {
        ValueCell::Str(cell)
    }
}

impl Scalar for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn parse_text(raw: &str) -> Result<Self, ValueError> {
        parse_bool_literal(raw).ok_or_else(|| ValueError::InvalidFormat {
            value: raw.to_string(),
            expected: "a boolean",
        })
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn flag_default(action: Action) -> Option<Self> {
        match action {
            Action::StoreTrue => Some(false),
            Action::StoreFalse => Some(true),
            _ => None,
        }
    }

    fn into_cell(cell: TypedCell<Self>) -> ValueCell {
        ValueCell::Bool(cell)
    }
}

/// Parse an integer literal: optional sign, then decimal digits or a
/// `0x`/`0o`/`0b` prefixed body. Underscores may separate digits.
pub fn parse_int_literal(raw: &str) -> Option<i64> {
    let (negative, body) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, digits) = match body.get(..2) {
        Some("0x") | Some("0X") => (16, &body[2..]),
        Some("0o") | Some("0O") => (8, &body[2..]),
        Some("0b") | Some("0B") => (2, &body[2..]),
        _ => (10, body),
    };

    // A leading underscore is not a literal in base 10 ("_1" is an identifier).
    if radix == 10 && digits.starts_with('_') {
        return None;
    }

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() || cleaned.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = u64::from_str_radix(&cleaned, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Parse a boolean literal, case-insensitively.
pub fn parse_bool_literal(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "f" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Storage slot for one scalar kind.
pub struct TypedCell<T: Scalar> {
    slot: Handle<T>,
    default: T,
    constant: T,
    validator: Option<Validator<T>>,
}

impl<T: Scalar> TypedCell<T> {
    pub fn new(default: T, constant: T, validator: Option<Validator<T>>) -> Self {
        Self {
            slot: Handle::new(default.clone()),
            default,
            constant,
            validator,
        }
    }

    pub fn handle(&self) -> Handle<T> {
        self.slot.clone()
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    fn get(&self) -> String {
        self.slot.with(T::render)
    }

    fn set(&self, raw: &str) -> Result<(), ValueError> {
        let value = T::parse_text(raw)?;
        if let Some(check) = &self.validator {
            if !check(&value) {
                return Err(ValueError::Rejected {
                    value: raw.to_string(),
                });
            }
        }
        self.slot.set(value);
        Ok(())
    }

    fn set_default(&self) {
        self.slot.set(self.default.clone());
    }

    fn set_constant(&self) {
        self.slot.set(self.constant.clone());
    }
}

impl<T: Scalar> fmt::Debug for TypedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCell")
            .field("value", &self.slot)
            .field("default", &self.default)
            .field("constant", &self.constant)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// A value cell of one of the three scalar kinds.
#[derive(Debug)]
pub enum ValueCell {
    Int(TypedCell<i64>),
    Str(TypedCell<String>),
    Bool(TypedCell<bool>),
}

impl ValueCell {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueCell::Int(_) => ValueKind::Int,
            ValueCell::Str(_) => ValueKind::Str,
            ValueCell::Bool(_) => ValueKind::Bool,
        }
    }

    /// Current value as display text.
    pub fn get(&self) -> String {
        match self {
            ValueCell::Int(cell) => cell.get(),
            ValueCell::Str(cell) => cell.get(),
            ValueCell::Bool(cell) => cell.get(),
        }
    }

    /// Coerce, validate and store `raw`. The slot is untouched on failure.
    pub fn set(&self, raw: &str) -> Result<(), ValueError> {
        match self {
            ValueCell::Int(cell) => cell.set(raw),
            ValueCell::Str(cell) => cell.set(raw),
            ValueCell::Bool(cell) => cell.set(raw),
        }
    }

    /// Reset to the declared default. Idempotent.
    pub fn set_default(&self) {
        match self {
            ValueCell::Int(cell) => cell.set_default(),
            ValueCell::Str(cell) => cell.set_default(),
            ValueCell::Bool(cell) => cell.set_default(),
        }
    }

    pub fn set_true(&self) -> Result<(), ValueError> {
        match self {
            ValueCell::Bool(cell) => {
                cell.slot.set(true);
                Ok(())
            }
            other => Err(other.unsupported(Action::StoreTrue)),
        }
    }

    pub fn set_false(&self) -> Result<(), ValueError> {
        match self {
            ValueCell::Bool(cell) => {
                cell.slot.set(false);
                Ok(())
            }
            other => Err(other.unsupported(Action::StoreFalse)),
        }
    }

    pub fn set_constant(&self) {
        match self {
            ValueCell::Int(cell) => cell.set_constant(),
            ValueCell::Str(cell) => cell.set_constant(),
            ValueCell::Bool(cell) => cell.set_constant(),
        }
    }

    pub fn increment(&self) -> Result<(), ValueError> {
        match self {
            ValueCell::Int(cell) => {
                let next = cell.slot.with(|current| current.saturating_add(1));
                cell.slot.set(next);
                Ok(())
            }
            other => Err(other.unsupported(Action::Increment)),
        }
    }

    fn unsupported(&self, action: Action) -> ValueError {
        ValueError::UnsupportedAction {
            kind: self.kind(),
            action,
        }
    }
}
