//! Output primitives: the icon write gate, container packers and their
//! filesystem helpers.
pub mod container;
pub mod helpers;
pub mod icon;

/// Occupancy of a destination path.
///
/// # Examples
///
/// ```
/// use icon_converter::resources::ResourceState;
///
/// assert_ne!(ResourceState::Missing, ResourceState::Present);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the destination.
    Missing,
    /// A file (or anything else) already occupies the destination.
    Present,
}
