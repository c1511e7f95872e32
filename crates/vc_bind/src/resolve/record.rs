use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::BindError;
use crate::decl::{FieldCandidate, LiftFn, RecordDecl, TypeDecl, UnionDecl};
use crate::descriptor::{
    Descriptor, Field, FieldOrigin, FieldShape, Nested, RecordInfo, Slot, UnionInfo, UnionMember,
};
use crate::info::TypeHandle;
use crate::resolve::{Candidate, ComponentFinder, ResolveScope, check_member_kind, check_tags};

type Merged = Vec<(FieldCandidate, FieldOrigin)>;

/// Resolves a record declaration into a [`RecordInfo`].
///
/// Fields of a projected record come from the projection's data type.
pub(super) fn resolve(
    candidate: &Candidate<'_>,
    decl: &RecordDecl,
    scope: &mut ResolveScope<'_>,
) -> Result<Descriptor, BindError> {
    let handle = *candidate.handle();
    let ty = handle.name();

    let data_decl;
    let (source, source_decl) = match decl.projection() {
        Some(projection) => {
            data_decl = projection.data().declare();
            (*projection.data(), &data_decl)
        }
        None => (handle, candidate.decl()),
    };
    let Some(source_record) = source_decl.record() else {
        return Err(BindError::unresolvable(
            ty,
            format!("projection data type `{}` is not a record", source.name()),
        ));
    };

    let merged = merge(ty, scope.finders(), &source, source_decl)?;
    let order = decl.order().or(source_record.order());
    let merged = match order {
        Some(order) => reorder(ty, merged, order)?,
        None => merged,
    };

    let mut fields = Vec::with_capacity(merged.len());
    for (index, (candidate, origin)) in merged.into_iter().enumerate() {
        fields.push(build_field(index, &candidate, origin, &source, scope)?);
    }

    let info = RecordInfo::new(
        handle,
        fields,
        source_record.constructor(),
        source_record.default_fn(),
        decl.projection().copied(),
    );
    Ok(Descriptor::Record(Arc::new(info)))
}

fn merge(
    ty: &'static str,
    finders: &[Box<dyn ComponentFinder>],
    handle: &TypeHandle,
    decl: &TypeDecl,
) -> Result<Merged, BindError> {
    let mut merged: Merged = Vec::new();
    for finder in finders {
        for found in finder.find_components(handle, decl) {
            match merged.iter_mut().find(|(c, _)| c.name() == found.name()) {
                Some((owner, _)) => {
                    if owner.ty() != found.ty() {
                        return Err(BindError::unresolvable(
                            ty,
                            format!(
                                "field `{}` is `{}`, but the {} finder reports `{}`",
                                found.name(),
                                owner.ty().name(),
                                finder.name(),
                                found.ty().name()
                            ),
                        ));
                    }
                    owner.complete_from(&found);
                }
                None => merged.push((found, finder.origin())),
            }
        }
    }
    Ok(merged)
}

fn reorder(ty: &'static str, merged: Merged, order: &[&'static str]) -> Result<Merged, BindError> {
    let mismatch = |detail: String| BindError::OrderMismatch { ty, detail };

    if let Some((i, name)) = order
        .iter()
        .enumerate()
        .find(|&(i, name)| order[..i].contains(name))
    {
        return Err(mismatch(format!("`{name}` is listed twice (position {i})")));
    }

    let mut pool: Vec<Option<_>> = merged.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(order.len());
    for name in order {
        let taken = pool
            .iter_mut()
            .find(|entry| entry.as_ref().is_some_and(|(c, _)| c.name() == *name))
            .and_then(Option::take);
        match taken {
            Some(entry) => ordered.push(entry),
            None => return Err(mismatch(format!("`{name}` is not a field"))),
        }
    }

    let missing: Vec<&str> = pool.iter().flatten().map(|(c, _)| c.name()).collect();
    if !missing.is_empty() {
        return Err(mismatch(format!("missing {}", missing.join(", "))));
    }
    Ok(ordered)
}

fn build_field(
    index: usize,
    candidate: &FieldCandidate,
    origin: FieldOrigin,
    owner: &TypeHandle,
    scope: &mut ResolveScope<'_>,
) -> Result<Field, BindError> {
    let name = candidate.name();
    let slot = Slot::analyze(*candidate.ty())?;
    let Some(getter) = candidate.getter().cloned() else {
        return Err(BindError::unresolvable(
            owner.name(),
            format!("field `{name}` has no getter"),
        ));
    };

    let nullable = slot.is_nullable();
    let primitive = slot.primitive();
    let hint = candidate.union_members();

    let shape = match (nullable, primitive, hint) {
        (true, Some(primitive), _) => FieldShape::OptionalPrimitive(primitive),
        (true, None, _) => FieldShape::Optional,
        (false, _, Some(_)) => FieldShape::UnionMember,
        (false, _, None) => FieldShape::Plain,
    };

    let required = if nullable {
        false
    } else if primitive.is_some() {
        true
    } else {
        candidate.required().unwrap_or(true)
    };

    let nested = match hint {
        Some(members) => Nested::Union(inline_union(owner, name, &slot, members, scope)?),
        None => {
            scope.resolve_nested(slot.target())?;
            Nested::Type(*slot.target())
        }
    };

    Ok(Field::new(
        index,
        name,
        owner.path(),
        slot,
        nested,
        required,
        shape,
        origin,
        getter,
        candidate.setter().cloned(),
    ))
}

/// A sealed view of the field's union type, limited to the listed members.
fn inline_union(
    owner: &TypeHandle,
    field: &'static str,
    slot: &Slot,
    members: &[TypeHandle],
    scope: &mut ResolveScope<'_>,
) -> Result<Arc<UnionInfo>, BindError> {
    let target = slot.target();
    let decl = target.declare();
    let Some(union) = decl.union() else {
        return Err(BindError::unresolvable(
            owner.name(),
            format!(
                "field `{field}` lists union members, but `{}` is not a union",
                target.name()
            ),
        ));
    };

    let mut resolved = Vec::with_capacity(members.len());
    for member in members {
        let Some(lift) = lift_of(target, union, member) else {
            return Err(BindError::UnionMembership {
                union: target.name(),
                member: member.name().into(),
            });
        };
        if let Some(descriptor) = scope.descriptor(member)? {
            check_member_kind(target, &descriptor)?;
        }
        resolved.push(UnionMember::new(*member, lift));
    }
    check_tags(target, &resolved)?;

    Ok(Arc::new(UnionInfo::new(
        *target,
        true,
        union.unwrap_fn(),
        resolved,
    )))
}

fn lift_of(union_ty: &TypeHandle, union: &UnionDecl, member: &TypeHandle) -> Option<LiftFn> {
    union
        .members()
        .iter()
        .find(|m| m.handle() == member)
        .map(|m| m.lift())
        .or_else(|| {
            member
                .declare()
                .supertypes()
                .iter()
                .find(|s| s.union_id() == union_ty.id())
                .map(|s| s.lift())
        })
}

#[cfg(test)]
mod tests {
    use super::reorder;
    use crate::BindError;
    use crate::decl::FieldCandidate;
    use crate::descriptor::FieldOrigin;
    use crate::info::TypeHandle;
    use alloc::vec::Vec;

    fn merged(names: &[&'static str]) -> Vec<(FieldCandidate, FieldOrigin)> {
        names
            .iter()
            .map(|n| (FieldCandidate::new(*n, TypeHandle::of::<u8>()), FieldOrigin::Accessor))
            .collect()
    }

    #[test]
    fn reorder_is_a_permutation() {
        let ordered = reorder("T", merged(&["a", "b", "c"]), &["c", "a", "b"]).unwrap();
        let names: Vec<_> = ordered.iter().map(|(c, _)| c.name()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn reorder_rejects_non_bijections() {
        for order in [&["a", "b"][..], &["a", "b", "z"], &["a", "a", "b"], &["a", "b", "c", "d"]] {
            assert!(
                matches!(
                    reorder("T", merged(&["a", "b", "c"]), order),
                    Err(BindError::OrderMismatch { ty: "T", .. })
                ),
                "{order:?}"
            );
        }
    }
}
