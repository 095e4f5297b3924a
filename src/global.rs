//! Process-wide default container.

use once_cell::sync::Lazy;

use crate::container::Container;

static GLOBAL: Lazy<Container> = Lazy::new(Container::new);

/// Returns the process-wide default [`Container`].
///
/// The global container is an ordinary [`Container`] constructed lazily on
/// first access; it exists so applications with a single composition root
/// can skip threading a container handle through every layer. Libraries
/// should keep taking `&Container` and leave the choice to the binary.
///
/// Tests sharing the global container must serialize themselves and
/// [`reset`](Container::reset) between cases, or simply construct their own
/// containers.
///
/// # Examples
///
/// ```rust
/// use crucible_di::global;
///
/// struct Config {
///     port: u16,
/// }
///
/// global().bind(Config { port: 8080 }).unwrap();
/// global().build().unwrap();
///
/// assert_eq!(global().inject::<Config>().port, 8080);
///
/// global().reset();
/// ```
pub fn global() -> &'static Container {
    &GLOBAL
}
