use core::any::Any;

use crate::Fault;
use crate::decl::{Instance, Primitive};
use crate::info::TypeHandle;
use crate::scalar::{ScalarCodec, WireType};
use crate::value::Value;

/// A scalar type and the codec reducing it to a [`WireType`].
#[derive(Debug)]
pub struct AtomInfo {
    handle: TypeHandle,
    primitive: Option<Primitive>,
    codec: ScalarCodec,
}

impl AtomInfo {
    pub fn new(handle: TypeHandle, primitive: Option<Primitive>, codec: ScalarCodec) -> Self {
        Self {
            handle,
            primitive,
            codec,
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    #[inline]
    pub fn primitive(&self) -> Option<Primitive> {
        self.primitive
    }

    #[inline]
    pub fn wire_type(&self) -> WireType {
        self.codec.wire()
    }

    #[inline]
    pub fn codec(&self) -> &ScalarCodec {
        &self.codec
    }

    /// Reduces a native value to its wire scalar.
    #[inline]
    pub fn encode(&self, value: &dyn Any) -> Result<Value, Fault> {
        self.codec.encode(value)
    }

    /// Rebuilds a native value from its wire scalar.
    #[inline]
    pub fn decode(&self, value: Value) -> Result<Instance, Fault> {
        self.codec.decode(value)
    }
}
