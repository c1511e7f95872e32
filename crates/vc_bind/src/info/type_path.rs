use core::any::{Any, TypeId};

// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// A stable alternative to [`core::any::type_name`], used for error messages
/// and as the default union tag of a type ([`TypePath::type_name`]).
///
/// Names never start with `::`.
///
/// # Implementation
///
/// [`#[derive(Bind)]`](crate::derive::Bind) implements this trait. Manual
/// implementations of generic types can use
/// [`GenericTypePathCell`](crate::impls::GenericTypePathCell):
///
/// ```
/// use vc_bind::info::TypePath;
/// use vc_bind::impls::{concat, GenericTypePathCell};
///
/// struct Wrapper<T>(T);
///
/// impl<T: TypePath> TypePath for Wrapper<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["demo::Wrapper<", T::type_path(), ">"]))
///     }
///     fn type_name() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["Wrapper<", T::type_name(), ">"]))
///     }
///     fn type_ident() -> &'static str { "Wrapper" }
///     fn module_path() -> Option<&'static str> { Some("demo") }
/// }
///
/// assert_eq!(<Wrapper<u8>>::type_path(), "demo::Wrapper<u8>");
/// assert_eq!(<Wrapper<String>>::type_name(), "Wrapper<String>");
/// ```
pub trait TypePath: 'static {
    /// The fully qualified path with generics, e.g. `alloc::vec::Vec<u8>`.
    fn type_path() -> &'static str;

    /// The path without modules, e.g. `Vec<u8>`.
    fn type_name() -> &'static str;

    /// The name without modules and generics, e.g. `Vec`.
    fn type_ident() -> &'static str;

    /// The module the type lives in, `None` for primitives.
    fn module_path() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// TypePathTable

/// Function table of a type's [`TypePath`] methods.
#[derive(Clone, Copy)]
pub struct TypePathTable {
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
    type_ident: fn() -> &'static str,
    module_path: fn() -> Option<&'static str>,
}

impl TypePathTable {
    /// Creates a table from a type implementing [`TypePath`].
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path: T::type_path,
            type_name: T::type_name,
            type_ident: T::type_ident,
            module_path: T::module_path,
        }
    }

    /// Creates a table from [`core::any::type_name`].
    ///
    /// Used for foreign scalar types that do not implement [`TypePath`].
    #[inline]
    pub const fn opaque<T: ?Sized>() -> Self {
        Self {
            type_path: core::any::type_name::<T>,
            type_name: opaque_name::<T>,
            type_ident: opaque_ident::<T>,
            module_path: opaque_module::<T>,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }

    #[inline(always)]
    pub fn ident(&self) -> &'static str {
        (self.type_ident)()
    }

    #[inline(always)]
    pub fn module_path(&self) -> Option<&'static str> {
        (self.module_path)()
    }
}

impl core::fmt::Debug for TypePathTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

// `a::b::C<d::E>` splits into module `a::b` and name `C<d::E>`.
fn split_opaque(path: &'static str) -> (Option<&'static str>, &'static str) {
    let head = path.find('<').map_or(path, |generic| &path[..generic]);
    match head.rfind("::") {
        Some(pos) => (Some(&path[..pos]), &path[pos + 2..]),
        None => (None, path),
    }
}

fn opaque_name<T: ?Sized>() -> &'static str {
    split_opaque(core::any::type_name::<T>()).1
}

fn opaque_ident<T: ?Sized>() -> &'static str {
    let name = opaque_name::<T>();
    name.find('<').map_or(name, |generic| &name[..generic])
}

fn opaque_module<T: ?Sized>() -> Option<&'static str> {
    split_opaque(core::any::type_name::<T>()).0
}

// -----------------------------------------------------------------------------
// Type

/// The [`TypeId`] of a type together with its names.
///
/// Equality and hashing only consider the [`TypeId`].
///
/// # Example
///
/// ```
/// # use core::any::TypeId;
/// # use vc_bind::info::Type;
/// let ty = Type::of::<String>();
/// assert_eq!(ty.id(), TypeId::of::<String>());
/// assert_eq!(ty.path(), "alloc::string::String");
/// assert_eq!(ty.name(), "String");
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    type_path_table: TypePathTable,
    type_id: TypeId,
}

impl Type {
    /// Creates a [`Type`] from a type implementing [`TypePath`].
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path_table: TypePathTable::of::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Creates a [`Type`] named after [`core::any::type_name`].
    ///
    /// ```
    /// # use vc_bind::info::Type;
    /// struct Token(u64);
    /// let ty = Type::opaque::<Token>();
    /// assert_eq!(ty.name(), "Token");
    /// ```
    #[inline]
    pub const fn opaque<T: Any + ?Sized>() -> Self {
        Self {
            type_path_table: TypePathTable::opaque::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    /// Check if the given type matches this one.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    #[inline(always)]
    pub const fn path_table(&self) -> TypePathTable {
        self.type_path_table
    }

    /// See [`TypePath::type_path`].
    #[inline]
    pub fn path(&self) -> &'static str {
        self.type_path_table.path()
    }

    /// See [`TypePath::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.type_path_table.name()
    }

    /// See [`TypePath::type_ident`].
    #[inline]
    pub fn ident(&self) -> &'static str {
        self.type_path_table.ident()
    }

    /// See [`TypePath::module_path`].
    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.type_path_table.module_path()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl core::hash::Hash for Type {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl core::fmt::Debug for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}
