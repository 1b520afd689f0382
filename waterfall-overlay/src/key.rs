#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::portal::PortalNode;

#[cfg(feature = "std")]
pub(crate) type PortalNodeMap<K> = HashMap<K, PortalNode>;
#[cfg(not(feature = "std"))]
pub(crate) type PortalNodeMap<K> = BTreeMap<K, PortalNode>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub trait PortalKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> PortalKey for K {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait PortalKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> PortalKey for K {}
