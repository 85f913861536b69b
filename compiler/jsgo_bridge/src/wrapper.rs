//! Wrapper factories: how structs without a host handle are presented.

use std::rc::Rc;

use jsgo_diagnostic::{FatalError, ResultExt};

use crate::descriptor::DescId;
use crate::host::{HostObject, HostValue, InternalRef};
use crate::value::Value;
use crate::Bridge;

/// Decides the host form of a struct value during externalization.
pub trait WrapperFactory {
    /// Host value standing in for `value`, a struct of descriptor `desc`
    /// (possibly reached through a pointer).
    fn wrap(&self, bridge: &Bridge, value: &Value, desc: DescId) -> Result<HostValue, FatalError>;
}

pub type Wrapper = Rc<dyn WrapperFactory>;

/// Presents a struct as a host object with its exported fields, carrying a
/// back-reference to the original. Internalizing that object gives back the
/// very same compiled value.
#[derive(Copy, Clone, Debug, Default)]
pub struct InternalRefWrapper;

impl WrapperFactory for InternalRefWrapper {
    fn wrap(&self, bridge: &Bridge, value: &Value, desc: DescId) -> Result<HostValue, FatalError> {
        let Some(obj) = value.as_struct() else {
            return Err(bridge.mismatch(desc, "struct"));
        };
        let object = HostObject::new();
        let values = obj.borrow().fields.clone();
        for (field, field_value) in bridge.table().struct_fields(desc)?.iter().zip(&values) {
            if !field.exported {
                continue;
            }
            let host = bridge
                .externalize(field_value, field.desc, None)
                .clue(|| format!("wrapping field {}", field.name))?;
            object.set(&field.name, host);
        }
        object.set_internal(InternalRef {
            desc,
            value: Value::Struct(Rc::clone(obj)),
        });
        Ok(HostValue::Object(Rc::new(object)))
    }
}
