//! Canonical type names.
//!
//! Derives a stable, collision-resistant string for a value's type, suitable
//! as a [`ServiceKey`](crate::key::ServiceKey) or a log label.
//!
//! The canonical form is `<module-path>.<type-name>`:
//!
//! ```
//! use sijill_container::naming::{name_of, type_name_of};
//!
//! assert_eq!(type_name_of::<String>(), "alloc::string.String");
//! assert_eq!(name_of::<String>(None), "nil");
//! ```
//!
//! [`std::any::type_name`] does not promise uniqueness: two `struct Probe;`
//! declared in sibling blocks of one function print the same path. The namer
//! remembers which [`TypeId`]s claimed each raw name; the first type keeps the
//! plain name and later ones get a `#2`, `#3`, ... suffix. Names are stable
//! for the lifetime of the process.

use std::any::{TypeId, type_name};
use std::borrow::Cow;

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Returned by [`name_of`] for an absent value.
pub const NIL: &str = "nil";

/// Raw `type_name` → type ids that produced it, in first-seen order.
static CLAIMS: Lazy<DashMap<&'static str, Vec<TypeId>>> = Lazy::new(DashMap::new);

/// Names the type of `value`, or returns `"nil"` when there is none.
///
/// The name reflects the static type `T`. For a `&dyn Trait` that is the
/// trait object type, not the concrete type behind it.
///
/// ```
/// use sijill_container::naming::name_of;
///
/// struct Mailer;
/// let a = name_of(Some(&Mailer));
/// let b = name_of(Some(&Mailer));
/// assert_eq!(a, b);
/// assert!(a.ends_with(".Mailer"));
/// ```
pub fn name_of<T: ?Sized + 'static>(value: Option<&T>) -> Cow<'static, str> {
    match value {
        Some(_) => type_name_of::<T>(),
        None => Cow::Borrowed(NIL),
    }
}

/// Canonical name of type `T`.
///
/// Distinct types that print the same path get a `#2`, `#3`, ... suffix in
/// the order they are first named. Suffixed names are stable only within a
/// process; do not persist them as keys.
pub fn type_name_of<T: ?Sized + 'static>() -> Cow<'static, str> {
    disambiguate(type_name::<T>(), TypeId::of::<T>())
}

/// Rewrites a raw Rust type path into `<module-path>.<type-name>`.
///
/// Only the outermost path is rewritten; generic arguments are kept as
/// printed. Names with no module path (primitives, references, slices,
/// tuples, trait objects) come back unchanged.
///
/// ```
/// use sijill_container::naming::canonicalize;
///
/// assert_eq!(canonicalize("my_app::db::Pool"), "my_app::db.Pool");
/// assert_eq!(
///     canonicalize("alloc::vec::Vec<alloc::string::String>"),
///     "alloc::vec.Vec<alloc::string::String>"
/// );
/// assert_eq!(canonicalize("&str"), "&str");
/// assert_eq!(canonicalize("u64"), "u64");
/// ```
pub fn canonicalize(raw: &str) -> Cow<'_, str> {
    let starts_with_path = raw
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_with_path {
        return Cow::Borrowed(raw);
    }

    let head = &raw[..raw.find('<').unwrap_or(raw.len())];
    if head.contains(' ') || head.contains('(') {
        return Cow::Borrowed(raw);
    }

    match head.rfind("::") {
        Some(split) => Cow::Owned(format!("{}.{}", &raw[..split], &raw[split + 2..])),
        None => Cow::Borrowed(raw),
    }
}

fn disambiguate(raw: &'static str, id: TypeId) -> Cow<'static, str> {
    let canonical = canonicalize(raw);
    match claim(raw, id) {
        0 => canonical,
        ordinal => Cow::Owned(format!("{canonical}#{}", ordinal + 1)),
    }
}

/// Returns the position of `id` among the types that printed as `raw`.
fn claim(raw: &'static str, id: TypeId) -> usize {
    if let Some(ids) = CLAIMS.get(raw)
        && let Some(position) = ids.iter().position(|&seen| seen == id)
    {
        return position;
    }

    let mut ids = CLAIMS.entry(raw).or_default();
    match ids.iter().position(|&seen| seen == id) {
        Some(position) => position,
        None => {
            ids.push(id);
            ids.len() - 1
        }
    }
}
