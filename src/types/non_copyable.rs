/// A type that can be constructed but never duplicated.
///
/// `NonCopyable` implements neither `Clone` nor `Copy`:
///
/// ```compile_fail
/// use rust_types::NonCopyable;
///
/// let a = NonCopyable::default();
/// let b = a.clone();
/// ```
///
/// Assigning it moves it, the moved-from binding can't be used afterwards:
///
/// ```compile_fail
/// use rust_types::NonCopyable;
///
/// let a = NonCopyable::default();
/// let b = a;
/// let c = a;
/// ```
#[derive(Debug, Default)]
pub struct NonCopyable;
