use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use std::sync::{PoisonError, RwLock};

use log::{debug, trace};
use vc_utils::TypeIdMap;

use crate::context::TypeContext;
use crate::decl::Instance;
use crate::descriptor::{
    ArrayInfo, AtomInfo, Descriptor, Field, Nested, RecordInfo, Slot, UnionInfo,
};
use crate::info::TypeHandle;
use crate::mapper::form::Form;
use crate::value::Value;
use crate::{BindError, Fault};

// -----------------------------------------------------------------------------
// Plan

/// A converter compiled from a descriptor.
///
/// Plans are shared by both forms, the layout of records and unions is
/// chosen when a plan runs.
pub(crate) enum Plan {
    Atom(Arc<AtomInfo>),
    Record {
        info: Arc<RecordInfo>,
        fields: Box<[Link]>,
    },
    Array {
        info: Arc<ArrayInfo>,
        element: Link,
    },
    /// Members are planned when a value of that member is seen.
    Union(Arc<UnionInfo>),
}

impl Plan {
    #[inline]
    fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }
}

/// The plan of a nested position.
pub(crate) enum Link {
    Ready(Arc<Plan>),
    /// Points back to a type whose plan was being compiled.
    Deferred(TypeHandle),
}

impl Link {
    #[inline]
    fn is_union(&self) -> bool {
        matches!(self, Self::Ready(plan) if matches!(**plan, Plan::Union(_)))
    }
}

// -----------------------------------------------------------------------------
// Compiler

enum Edge {
    Root,
    /// A non-nullable field, the value is stored inline.
    Direct(&'static str),
    /// A nullable field or a sequence element.
    Mediated,
}

struct Frame {
    id: TypeId,
    name: &'static str,
    edge: Edge,
}

struct Compiler<'a> {
    plans: &'a Plans,
    frames: Vec<Frame>,
    compiled: Vec<(TypeId, Arc<Plan>)>,
}

impl Compiler<'_> {
    fn compile(&mut self, descriptor: &Descriptor, edge: Edge) -> Result<Arc<Plan>, BindError> {
        let handle = *descriptor.handle();
        let plan = match descriptor {
            Descriptor::Atom(info) => Plan::Atom(info.clone()),
            Descriptor::Union(info) => Plan::Union(info.clone()),
            Descriptor::Record(info) => {
                self.enter(&handle, edge);
                let fields: Result<Box<[Link]>, BindError> =
                    info.fields().iter().map(|f| self.field(f)).collect();
                self.frames.pop();
                Plan::Record {
                    info: info.clone(),
                    fields: fields?,
                }
            }
            Descriptor::Array(info) => {
                self.enter(&handle, edge);
                let element = self.link(info.element().target(), Edge::Mediated);
                self.frames.pop();
                Plan::Array {
                    info: info.clone(),
                    element: element?,
                }
            }
        };

        let plan = Arc::new(plan);
        self.compiled.push((handle.id(), plan.clone()));
        Ok(plan)
    }

    fn enter(&mut self, handle: &TypeHandle, edge: Edge) {
        self.frames.push(Frame {
            id: handle.id(),
            name: handle.name(),
            edge,
        });
    }

    fn field(&mut self, field: &Field) -> Result<Link, BindError> {
        match field.nested() {
            Nested::Union(inline) => Ok(Link::Ready(Arc::new(Plan::Union(inline.clone())))),
            Nested::Type(target) => {
                let edge = if field.slot().is_nullable() {
                    Edge::Mediated
                } else {
                    Edge::Direct(field.name())
                };
                self.link(target, edge)
            }
        }
    }

    fn link(&mut self, target: &TypeHandle, edge: Edge) -> Result<Link, BindError> {
        if let Edge::Direct(field) = edge {
            self.check_direct(target, field)?;
        }
        if let Some(plan) = self.plans.cached(target.id()) {
            return Ok(Link::Ready(plan));
        }
        if self.frames.iter().any(|f| f.id == target.id()) {
            trace!("deferring the plan of `{}`", target.name());
            return Ok(Link::Deferred(*target));
        }
        let descriptor = self.plans.ctx.get_descriptor(target)?;
        self.compile(&descriptor, edge).map(Link::Ready)
    }

    /// Fails if `target` encloses itself through non-nullable fields only.
    fn check_direct(&self, target: &TypeHandle, field: &'static str) -> Result<(), BindError> {
        for (i, frame) in self.frames.iter().enumerate().rev() {
            if frame.id == target.id() {
                let mut cycle = String::new();
                for (k, frame) in self.frames[i..].iter().enumerate() {
                    let via = match self.frames.get(i + k + 1) {
                        Some(Frame {
                            edge: Edge::Direct(name),
                            ..
                        }) => name,
                        _ => &field,
                    };
                    cycle.push_str(&format!("{}.{via} -> ", frame.name));
                }
                cycle.push_str(target.name());
                return Err(BindError::RecursiveStructure {
                    ty: target.name(),
                    cycle,
                });
            }
            if !matches!(frame.edge, Edge::Direct(_)) {
                break;
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Plans

/// The plan cache of a mapper.
///
/// Plans of a compilation are published together, and only when the whole
/// compilation succeeded.
pub(crate) struct Plans {
    ctx: TypeContext,
    cache: RwLock<TypeIdMap<Arc<Plan>>>,
}

impl Plans {
    pub(crate) fn new(ctx: &TypeContext) -> Self {
        Self {
            ctx: ctx.clone(),
            cache: RwLock::new(TypeIdMap::new()),
        }
    }

    #[inline]
    pub(crate) fn context(&self) -> &TypeContext {
        &self.ctx
    }

    fn cached(&self, type_id: TypeId) -> Option<Arc<Plan>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    /// Returns the plan of a type, resolving and compiling as needed.
    pub(crate) fn plan(&self, handle: &TypeHandle) -> Result<Arc<Plan>, BindError> {
        match self.cached(handle.id()) {
            Some(plan) => Ok(plan),
            None => self.plan_for(&self.ctx.get_descriptor(handle)?),
        }
    }

    pub(crate) fn plan_for(&self, descriptor: &Descriptor) -> Result<Arc<Plan>, BindError> {
        let id = descriptor.handle().id();
        if let Some(plan) = self.cached(id) {
            return Ok(plan);
        }

        let mut compiler = Compiler {
            plans: self,
            frames: Vec::new(),
            compiled: Vec::new(),
        };
        compiler.compile(descriptor, Edge::Root)?;

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let count = compiler.compiled.len();
        for (type_id, plan) in compiler.compiled {
            cache.try_insert(type_id, || plan);
        }
        debug!(
            "compiled {count} plans for `{}`",
            descriptor.handle().name()
        );
        cache.get(&id).cloned().ok_or_else(|| {
            BindError::unresolvable(descriptor.handle().name(), "plan was not published")
        })
    }

    // -------------------------------------------------------------------------
    // Encoding

    pub(crate) fn encode<F: Form>(&self, plan: &Plan, value: &dyn Any) -> Result<Value, BindError> {
        match plan {
            Plan::Atom(info) => Ok(info.encode(value)?),
            Plan::Record { info, fields } => {
                let data = info.to_data(value)?;
                let data = data.as_any();
                let mut values = Vec::with_capacity(fields.len());
                for (field, link) in info.fields().iter().zip(fields) {
                    let encoded = self
                        .encode_field::<F>(field, link, data)
                        .map_err(|err| err.at_field(field.name()))?;
                    values.push(encoded);
                }
                Ok(F::write_record(info, values))
            }
            Plan::Array { info, element } => {
                let mut items = Vec::with_capacity(info.size_of(value)?);
                let mut cursor = info.make_iterator(value)?;
                while let Some(item) = cursor.get_next() {
                    let encoded = self
                        .encode_element::<F>(info.element(), element, item)
                        .map_err(|err| err.at_index(items.len()))?;
                    items.push(encoded);
                }
                Ok(Value::Seq(items))
            }
            Plan::Union(info) => {
                let inner = info.unwrap(value)?;
                let concrete = Any::type_id(inner);
                let Some(member) = info.member_by_type(concrete) else {
                    return Err(BindError::UnionMembership {
                        union: info.handle().name(),
                        member: self.name_of(concrete),
                    });
                };
                let plan = self.plan(member.handle())?;
                let encoded = self.encode::<F>(&plan, inner)?;
                Ok(F::write_union(member.tag(), encoded, plan.is_record())?)
            }
        }
    }

    fn encode_field<F: Form>(
        &self,
        field: &Field,
        link: &Link,
        data: &dyn Any,
    ) -> Result<Option<Value>, BindError> {
        match field.value(data)? {
            Some(value) => self.encode_link::<F>(link, value).map(Some),
            None => Ok(F::absent(link.is_union())),
        }
    }

    fn encode_element<F: Form>(
        &self,
        slot: &Slot,
        link: &Link,
        item: &dyn Any,
    ) -> Result<Value, BindError> {
        match slot.peel(item)? {
            Some(value) => self.encode_link::<F>(link, value),
            None => Ok(F::absent(link.is_union()).unwrap_or_default()),
        }
    }

    fn encode_link<F: Form>(&self, link: &Link, value: &dyn Any) -> Result<Value, BindError> {
        match link {
            Link::Ready(plan) => self.encode::<F>(plan, value),
            Link::Deferred(handle) => self.encode::<F>(&*self.plan(handle)?, value),
        }
    }

    fn name_of(&self, type_id: TypeId) -> String {
        match self.ctx.cached(type_id) {
            Some(descriptor) => String::from(descriptor.handle().name()),
            None => format!("{type_id:?}"),
        }
    }

    // -------------------------------------------------------------------------
    // Decoding

    pub(crate) fn decode<F: Form>(&self, plan: &Plan, value: Value) -> Result<Instance, BindError> {
        match plan {
            Plan::Atom(info) => Ok(info.decode(value)?),
            Plan::Record { info, fields } => {
                let slots = F::read_record(info, value)?;
                let mut values = Vec::with_capacity(slots.len());
                for ((field, link), slot) in info.fields().iter().zip(fields).zip(slots) {
                    let decoded = self
                        .decode_slot::<F>(field.slot(), link, slot)
                        .map_err(|err| err.at_field(field.name()))?;
                    values.push(decoded);
                }
                info.construct(values)
            }
            Plan::Array { info, element } => {
                let Value::Seq(items) = value else {
                    return Err(Fault::Mismatch {
                        expected: "sequence",
                        found: value.kind_name(),
                    }
                    .into());
                };
                let mut builder = info.new_builder(items.len())?;
                for (index, item) in items.into_iter().enumerate() {
                    let at = |err: BindError| err.at_index(index);
                    match self.decode_slot::<F>(info.element(), element, Some(item)).map_err(at)? {
                        Some(decoded) => builder.put_next(decoded).map_err(|f| at(f.into()))?,
                        None => {
                            return Err(at(Fault::Mismatch {
                                expected: "value",
                                found: "null",
                            }
                            .into()));
                        }
                    }
                }
                Ok(builder.finish()?)
            }
            Plan::Union(info) => {
                let (tag, payload) = F::read_union(value)?;
                let Some(member) = info.member_by_tag(&tag) else {
                    return Err(BindError::UnionMembership {
                        union: info.handle().name(),
                        member: tag,
                    });
                };
                let plan = self.plan(member.handle())?;
                let payload = F::member_payload(plan.is_record(), payload)?;
                let decoded = self.decode::<F>(&plan, payload)?;
                Ok(member.lift(decoded)?)
            }
        }
    }

    /// Decodes a field or element, `None` if it is absent and not nullable.
    fn decode_slot<F: Form>(
        &self,
        slot: &Slot,
        link: &Link,
        value: Option<Value>,
    ) -> Result<Option<Instance>, BindError> {
        match value {
            Some(value) if !F::is_absent(&value, link.is_union()) => {
                let target = self.decode_link::<F>(link, value)?;
                Ok(Some(slot.wrap(target)?))
            }
            _ => Ok(slot.wrap_absent()?),
        }
    }

    fn decode_link<F: Form>(&self, link: &Link, value: Value) -> Result<Instance, BindError> {
        match link {
            Link::Ready(plan) => self.decode::<F>(plan, value),
            Link::Deferred(handle) => self.decode::<F>(&*self.plan(handle)?, value),
        }
    }
}

impl fmt::Debug for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Plans")
            .field("compiled", &cache.len())
            .finish_non_exhaustive()
    }
}
