use alloc::vec::Vec;

use crate::info::{InterfaceRef, MethodSignature};
use crate::{Bean, Result, Value};

/// Implementation of the behavioral methods of one interface.
///
/// [`methods`] must list a signature equal to every behavioral method of
/// [`interface`], this is checked when the behavior is attached. Extra
/// methods are allowed.
///
/// Behaviors are shared between a bean and its copies and views, and should
/// therefore keep per-bean state in the bean itself.
///
/// [`methods`]: InterfaceBehavior::methods
/// [`interface`]: InterfaceBehavior::interface
pub trait InterfaceBehavior {
    /// The interface this behavior serves.
    fn interface(&self) -> InterfaceRef;

    /// The signatures this behavior implements.
    fn methods(&self) -> Vec<MethodSignature>;

    /// Handles a call of `method` on `bean`.
    fn invoke(&self, bean: &Bean, method: &str, args: &[Value]) -> Result<Value>;
}
