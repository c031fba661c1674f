use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

use serde::Deserialize;

use crate::view::layout::{self, FieldShape, StructLayout};
use crate::view::{Result, Target, ViewError};

/// Declared type of an inferior value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
	/// Type name as spelled by the host.
	pub name: Box<str>,
	/// Shape of the type.
	pub kind: TypeKind,
	/// Element type for parametric sequence instantiations.
	pub element: Option<Arc<TypeDescriptor>>,
}

/// Shape of a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
	/// Fixed-width integer.
	Scalar {
		/// Width in bytes.
		size: usize,
		/// Whether the integer is two's-complement signed.
		signed: bool,
	},
	/// One layer of indirection.
	Pointer {
		/// Pointed-to type.
		pointee: Pointee,
	},
	/// Aggregate with host-described fields.
	Struct {
		/// Fields in declaration order.
		fields: Vec<FieldDesc>,
		/// Total size recorded by the host, if any.
		size: Option<usize>,
	},
	/// Sized type whose fields the host does not expose.
	Opaque {
		/// Width in bytes.
		size: usize,
	},
}

/// Pointed-to type of a pointer descriptor.
///
/// Pointers between declared types refer to their target by name through the owning
/// [`TypeTable`], so self-referential and mutually linked structs can be described.
/// Such a pointee resolves only while its table is alive.
#[derive(Clone)]
pub struct Pointee {
	name: Box<str>,
	target: PointeeTarget,
}

#[derive(Clone)]
enum PointeeTarget {
	Resolved(Arc<TypeDescriptor>),
	Table(Weak<TypeMap>),
}

type TypeMap = BTreeMap<Box<str>, Arc<TypeDescriptor>>;

impl Pointee {
	/// Pointee held directly.
	pub fn resolved(ty: Arc<TypeDescriptor>) -> Self {
		Self {
			name: ty.name.clone(),
			target: PointeeTarget::Resolved(ty),
		}
	}

	fn in_table(name: &str, table: Weak<TypeMap>) -> Self {
		Self {
			name: name.into(),
			target: PointeeTarget::Table(table),
		}
	}

	/// Pointed-to type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Pointed-to descriptor, or `None` once the owning table is gone.
	pub fn get(&self) -> Option<Arc<TypeDescriptor>> {
		match &self.target {
			PointeeTarget::Resolved(ty) => Some(Arc::clone(ty)),
			PointeeTarget::Table(table) => lookup(&*table.upgrade()?, &self.name).ok(),
		}
	}
}

impl PartialEq for Pointee {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl fmt::Debug for Pointee {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Pointee").field(&self.name).finish()
	}
}

/// One field of a struct type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
	/// Field name, absent when the host strips names.
	pub name: Option<Box<str>>,
	/// Field type.
	pub ty: Arc<TypeDescriptor>,
	/// Byte offset recorded by the host.
	pub offset: Option<u64>,
}

impl FieldDesc {
	/// Named field with computed placement.
	pub fn named(name: &str, ty: Arc<TypeDescriptor>) -> Self {
		Self {
			name: Some(name.into()),
			ty,
			offset: None,
		}
	}
}

impl TypeDescriptor {
	/// Fixed-width integer type.
	pub fn scalar(name: &str, size: usize, signed: bool) -> Self {
		Self {
			name: name.into(),
			kind: TypeKind::Scalar { size, signed },
			element: None,
		}
	}

	/// Pointer to `pointee`, named `<pointee>*`.
	pub fn pointer_to(pointee: Arc<TypeDescriptor>) -> Self {
		Self::pointer(Pointee::resolved(pointee))
	}

	fn pointer(pointee: Pointee) -> Self {
		Self {
			name: format!("{}*", pointee.name()).into_boxed_str(),
			kind: TypeKind::Pointer { pointee },
			element: None,
		}
	}

	/// Struct type with fields in declaration order.
	pub fn structure(name: &str, fields: Vec<FieldDesc>) -> Self {
		Self {
			name: name.into(),
			kind: TypeKind::Struct { fields, size: None },
			element: None,
		}
	}

	/// Sized type without field information.
	pub fn opaque(name: &str, size: usize) -> Self {
		Self {
			name: name.into(),
			kind: TypeKind::Opaque { size },
			element: None,
		}
	}

	/// Attach a parametric element type.
	pub fn with_element(mut self, element: Arc<TypeDescriptor>) -> Self {
		self.element = Some(element);
		self
	}

	/// Whether this type is a pointer.
	pub fn is_pointer(&self) -> bool {
		matches!(self.kind, TypeKind::Pointer { .. })
	}

	/// Pointee type when this is a pointer whose target still resolves.
	pub fn pointee(&self) -> Option<Arc<TypeDescriptor>> {
		match &self.kind {
			TypeKind::Pointer { pointee } => pointee.get(),
			_ => None,
		}
	}

	/// Name with one layer of pointer indirection removed.
	pub fn value_name(&self) -> &str {
		match &self.kind {
			TypeKind::Pointer { pointee } => pointee.name(),
			_ => &self.name,
		}
	}

	/// Host-described fields; empty for non-struct kinds.
	pub fn fields(&self) -> &[FieldDesc] {
		match &self.kind {
			TypeKind::Struct { fields, .. } => fields,
			_ => &[],
		}
	}

	/// Index of the field called `name`.
	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields().iter().position(|field| field.name.as_deref() == Some(name))
	}

	/// Static byte size on `target`.
	pub fn size(&self, target: &Target) -> Result<usize> {
		match &self.kind {
			TypeKind::Scalar { size, .. } | TypeKind::Opaque { size } => Ok(*size),
			TypeKind::Pointer { .. } => Ok(target.pointer_size),
			TypeKind::Struct { size: Some(size), .. } => Ok(*size),
			TypeKind::Struct { size: None, .. } => Ok(self.struct_layout(target)?.size),
		}
	}

	/// Alignment on `target`.
	pub fn align(&self, target: &Target) -> Result<usize> {
		match &self.kind {
			TypeKind::Scalar { size, .. } | TypeKind::Opaque { size } => Ok(layout::natural_align(*size, target.pointer_size)),
			TypeKind::Pointer { .. } => Ok(target.pointer_size),
			TypeKind::Struct { .. } => Ok(self.struct_layout(target)?.align),
		}
	}

	/// Field layout of a struct type; an empty layout for other kinds.
	pub fn struct_layout(&self, target: &Target) -> Result<StructLayout> {
		let mut shapes = Vec::with_capacity(self.fields().len());
		for field in self.fields() {
			shapes.push(FieldShape {
				size: field.ty.size(target)?,
				align: field.ty.align(target)?,
				offset: field.offset,
			});
		}
		layout::compute(&shapes)
	}
}

/// Declarative type description, as stored in snapshot files.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeSpec {
	/// Fixed-width integer.
	Scalar {
		/// Type name.
		name: String,
		/// Width in bytes.
		size: usize,
		/// Signedness.
		#[serde(default)]
		signed: bool,
	},
	/// Named pointer type.
	Pointer {
		/// Type name.
		name: String,
		/// Pointee type name.
		pointee: String,
	},
	/// Struct with fields.
	Struct {
		/// Type name.
		name: String,
		/// Fields in declaration order.
		fields: Vec<FieldSpec>,
		/// Parametric element type name.
		#[serde(default)]
		element: Option<String>,
		/// Recorded total size.
		#[serde(default)]
		size: Option<usize>,
	},
	/// Sized type without fields.
	Opaque {
		/// Type name.
		name: String,
		/// Width in bytes.
		size: usize,
		/// Parametric element type name.
		#[serde(default)]
		element: Option<String>,
	},
}

impl TypeSpec {
	/// Declared type name.
	pub fn name(&self) -> &str {
		match self {
			Self::Scalar { name, .. } | Self::Pointer { name, .. } | Self::Struct { name, .. } | Self::Opaque { name, .. } => name,
		}
	}
}

/// Declarative field description.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
	/// Field name, omitted for hosts that strip names.
	#[serde(default)]
	pub name: Option<String>,
	/// Field type name.
	#[serde(rename = "type")]
	pub type_name: String,
	/// Recorded byte offset.
	#[serde(default)]
	pub offset: Option<u64>,
}

/// Resolved type descriptors addressable by name.
#[derive(Debug, Default)]
pub struct TypeTable {
	by_name: Arc<TypeMap>,
}

impl TypeTable {
	/// Resolve declarative specs into shared descriptors.
	///
	/// Pointers between declared types may form cycles (`Node { next: Node* }`); a type that
	/// contains itself by value is rejected with [`ViewError::RecursiveType`].
	pub fn build(specs: Vec<TypeSpec>) -> Result<Self> {
		let mut pending = BTreeMap::new();
		for spec in specs {
			let name = spec.name().to_owned();
			if pending.insert(name.clone(), spec).is_some() {
				return Err(ViewError::DuplicateType { name });
			}
		}

		let mut failure = None;
		let by_name = Arc::new_cyclic(|table: &Weak<TypeMap>| {
			let mut builder = TableBuilder {
				specs: &pending,
				table: table.clone(),
				done: BTreeMap::new(),
				active: HashSet::new(),
			};
			for name in pending.keys() {
				if let Err(err) = builder.resolve(name) {
					failure = Some(err);
					return TypeMap::new();
				}
			}
			builder.done
		});

		match failure {
			Some(err) => Err(err),
			None => Ok(Self { by_name }),
		}
	}

	/// Look up a type, deriving `T*` pointer spellings from `T` on demand.
	pub fn get(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
		lookup(&self.by_name, name)
	}

	/// Declared type names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.by_name.keys().map(|name| name.as_ref())
	}

	/// Number of declared types.
	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	/// Whether no types are declared.
	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}
}

fn lookup(map: &TypeMap, name: &str) -> Result<Arc<TypeDescriptor>> {
	let name = name.trim();
	if let Some(found) = map.get(name) {
		return Ok(Arc::clone(found));
	}
	if let Some(inner) = name.strip_suffix('*') {
		let pointee = lookup(map, inner)?;
		return Ok(Arc::new(TypeDescriptor::pointer_to(pointee)));
	}
	Err(ViewError::UnknownType { name: name.to_owned() })
}

struct TableBuilder<'a> {
	specs: &'a BTreeMap<String, TypeSpec>,
	table: Weak<TypeMap>,
	done: TypeMap,
	active: HashSet<String>,
}

impl TableBuilder<'_> {
	fn resolve(&mut self, name: &str) -> Result<Arc<TypeDescriptor>> {
		let name = name.trim();
		if let Some(found) = self.done.get(name) {
			return Ok(Arc::clone(found));
		}

		let specs = self.specs;
		let Some(spec) = specs.get(name) else {
			if let Some(inner) = name.strip_suffix('*') {
				let pointee = self.pointee(inner)?;
				return Ok(Arc::new(TypeDescriptor::pointer(pointee)));
			}
			return Err(ViewError::UnknownType { name: name.to_owned() });
		};

		if !self.active.insert(name.to_owned()) {
			return Err(ViewError::RecursiveType { name: name.to_owned() });
		}

		let descriptor = match spec {
			TypeSpec::Scalar { name, size, signed } => TypeDescriptor::scalar(name, *size, *signed),
			TypeSpec::Pointer { name, pointee } => TypeDescriptor {
				name: name.as_str().into(),
				kind: TypeKind::Pointer {
					pointee: self.pointee(pointee)?,
				},
				element: None,
			},
			TypeSpec::Struct { name, fields, element, size } => {
				let mut resolved = Vec::with_capacity(fields.len());
				for field in fields {
					resolved.push(FieldDesc {
						name: field.name.as_deref().map(Into::into),
						ty: self.resolve(&field.type_name)?,
						offset: field.offset,
					});
				}
				TypeDescriptor {
					name: name.as_str().into(),
					kind: TypeKind::Struct { fields: resolved, size: *size },
					element: self.resolve_optional(element.as_deref())?,
				}
			}
			TypeSpec::Opaque { name, size, element } => TypeDescriptor {
				name: name.as_str().into(),
				kind: TypeKind::Opaque { size: *size },
				element: self.resolve_optional(element.as_deref())?,
			},
		};

		self.active.remove(name);
		let descriptor = Arc::new(descriptor);
		self.done.insert(name.into(), Arc::clone(&descriptor));
		Ok(descriptor)
	}

	// Declared pointees stay unresolved until read; the name is only checked here.
	fn pointee(&self, name: &str) -> Result<Pointee> {
		let name = name.trim();
		if self.specs.contains_key(name) {
			return Ok(Pointee::in_table(name, self.table.clone()));
		}
		if let Some(inner) = name.strip_suffix('*') {
			let inner = self.pointee(inner)?;
			return Ok(Pointee::resolved(Arc::new(TypeDescriptor::pointer(inner))));
		}
		Err(ViewError::UnknownType { name: name.to_owned() })
	}

	fn resolve_optional(&mut self, name: Option<&str>) -> Result<Option<Arc<TypeDescriptor>>> {
		name.map(|item| self.resolve(item)).transpose()
	}
}
