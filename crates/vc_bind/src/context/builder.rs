use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::context::TypeContext;
use crate::resolve::{Classifier, ComponentFinder, Resolver, default_finders};
use crate::scalar::{ScalarCodec, ScalarRegistry};

/// Configures a [`TypeContext`].
///
/// # Example
///
/// ```
/// use vc_bind::context::TypeContext;
/// use vc_bind::resolve::SchemaFinder;
/// use vc_bind::scalar::ScalarCodec;
///
/// struct Id(u64);
///
/// let ctx = TypeContext::builder()
///     .with_scalar(ScalarCodec::bridge::<Id, u64>(|id| Ok(id.0), |v| Ok(Id(v))))
///     .with_finder(SchemaFinder::new())
///     .build();
///
/// let names: Vec<_> = ctx.resolver().finders().iter().map(|f| f.name()).collect();
/// assert_eq!(names, ["constructor", "accessor", "schema"]);
/// assert!(ctx.scalars().contains(core::any::TypeId::of::<Id>()));
/// ```
pub struct ContextBuilder {
    classifiers: Vec<Box<dyn Classifier>>,
    finders: Vec<Box<dyn ComponentFinder>>,
    default_finders: bool,
    scalars: Vec<ScalarCodec>,
}

impl Default for ContextBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            classifiers: Vec::new(),
            finders: Vec::new(),
            default_finders: true,
            scalars: Vec::new(),
        }
    }

    /// Adds a classifier tried before the built-in chain.
    ///
    /// Custom classifiers run in the order they were added.
    pub fn with_classifier(mut self, classifier: impl Classifier) -> Self {
        self.classifiers.push(Box::new(classifier));
        self
    }

    /// Adds a component finder after the built-in ones.
    pub fn with_finder(mut self, finder: impl ComponentFinder) -> Self {
        self.finders.push(Box::new(finder));
        self
    }

    /// Adds a scalar codec, replacing the default one of the same type.
    pub fn with_scalar(mut self, codec: ScalarCodec) -> Self {
        self.scalars.push(codec);
        self
    }

    /// Drops the constructor and accessor finders.
    pub fn without_default_finders(mut self) -> Self {
        self.default_finders = false;
        self
    }

    pub fn build(self) -> TypeContext {
        let scalars = ScalarRegistry::default();
        for codec in self.scalars {
            scalars.insert(codec);
        }

        let mut finders = if self.default_finders {
            default_finders()
        } else {
            Vec::new()
        };
        finders.extend(self.finders);

        TypeContext::from_parts(scalars, Resolver::new(self.classifiers, finders))
    }
}

#[cfg(test)]
mod tests {
    use super::ContextBuilder;
    use crate::BindError;
    use crate::decl::Bind;
    use crate::descriptor::{AtomInfo, Descriptor, Kind};
    use crate::resolve::{Candidate, Classifier, ResolveScope};
    use crate::scalar::ScalarCodec;
    use alloc::format;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    #[derive(Bind)]
    struct Version {
        major: u16,
        minor: u16,
    }

    // Writes versions as "major.minor".
    struct VersionAsText;

    impl Classifier for VersionAsText {
        fn name(&self) -> &'static str {
            "version"
        }

        fn classify(
            &self,
            candidate: &Candidate<'_>,
            _: &mut ResolveScope<'_>,
        ) -> Result<Option<Descriptor>, BindError> {
            if candidate.handle().id() != core::any::TypeId::of::<Version>() {
                return Ok(None);
            }
            let codec = ScalarCodec::bridge::<Version, String>(
                |v| Ok(format!("{}.{}", v.major, v.minor)),
                |_| Err(crate::Fault::custom("read-only")),
            );
            let info = AtomInfo::new(*candidate.handle(), None, codec);
            Ok(Some(Descriptor::Atom(Arc::new(info))))
        }
    }

    #[test]
    fn custom_classifiers_run_first() {
        let ctx = ContextBuilder::new().with_classifier(VersionAsText).build();
        let version = ctx.descriptor_of::<Version>().unwrap();
        assert_eq!(version.kind(), Kind::Atom);

        let names: Vec<_> = ctx.resolver().classifiers().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["version", "union", "array", "atom", "record"]);
    }

    #[test]
    fn records_need_a_finder() {
        let ctx = ContextBuilder::new().without_default_finders().build();
        let version = ctx.descriptor_of::<Version>().unwrap();
        assert!(version.as_record().unwrap().is_empty());
    }
}
