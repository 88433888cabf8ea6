//! The table of hooks that turns shell literals and `$`-keyed objects into typed values.

use std::{collections::HashMap, fmt, sync::LazyLock};

use ahash::RandomState;

use crate::{
    bson::Bson,
    document::Document,
    error::Result,
    extjson::hooks,
};

/// A decode rule triggered when the first key of an object matches. The hook receives the whole
/// object, decoded without keyed hooks, and returns the value it stands for.
pub type KeyedHook = fn(Document) -> Result<Bson>;

/// The rewrite rule for a constructor call: `Name(a, b)` is decoded as
/// `{"<key>":{"<args[0]>":a,"<args[1]>":b}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    /// The key of the synthetic object.
    pub key: String,

    /// Names given to the positional arguments, in order.
    pub args: Vec<String>,
}

static OUTER: LazyLock<Registry> = LazyLock::new(|| {
    hooks::register(RegistryBuilder::new())
        .unquoted_keys(true)
        .trailing_commas(true)
        .build()
});

/// A frozen set of hooks consulted by the decoder.
///
/// A registry is built once through a [`RegistryBuilder`] and is read-only afterwards, so one
/// instance can be shared by any number of concurrent decodes. Building a registry that has
/// keyed hooks also derives its *restricted* counterpart: the same constructors, constants and
/// syntax flags but no keyed hooks. Keyed hooks decode their own literal with the restricted
/// registry, so a hook can never re-enter itself.
///
/// ```
/// use mongoextjson::{extjson::registry::Registry, Bson};
///
/// let value = mongoextjson::decode_with(b"MinKey", Registry::outer())?;
/// assert_eq!(value, Bson::MinKey);
/// # Ok::<(), mongoextjson::error::Error>(())
/// ```
pub struct Registry {
    keyed: HashMap<String, KeyedHook, RandomState>,
    constructors: HashMap<String, Constructor, RandomState>,
    constants: HashMap<String, Bson, RandomState>,
    unquoted_keys: bool,
    trailing_commas: bool,
    restricted: Option<Box<Registry>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keyed: Vec<_> = self.keyed.keys().collect();
        keyed.sort();
        let mut constructors: Vec<_> = self.constructors.keys().collect();
        constructors.sort();
        let mut constants: Vec<_> = self.constants.keys().collect();
        constants.sort();

        f.debug_struct("Registry")
            .field("keyed", &keyed)
            .field("constructors", &constructors)
            .field("constants", &constants)
            .field("unquoted_keys", &self.unquoted_keys)
            .field("trailing_commas", &self.trailing_commas)
            .finish()
    }
}

impl Registry {
    /// The registry used by [`decode_bson`](crate::decode_bson) and friends: every built-in
    /// hook, unquoted keys and trailing commas.
    pub fn outer() -> &'static Registry {
        &OUTER
    }

    /// The restricted counterpart of [`Registry::outer`]: built-in constructors and constants
    /// only.
    pub fn inner() -> &'static Registry {
        OUTER.restricted()
    }

    /// The registry keyed hooks of this registry decode their literal with. A registry without
    /// keyed hooks is its own restricted registry.
    pub fn restricted(&self) -> &Registry {
        self.restricted.as_deref().unwrap_or(self)
    }

    /// The keyed hook triggered by `key`, if any.
    pub fn keyed_hook(&self, key: &str) -> Option<KeyedHook> {
        self.keyed.get(key).copied()
    }

    /// The rewrite rule for the constructor called `name`, if any.
    pub fn constructor(&self, name: &str) -> Option<&Constructor> {
        self.constructors.get(name)
    }

    /// The value of the bare identifier `name`, if it is a registered constant.
    pub fn constant(&self, name: &str) -> Option<&Bson> {
        self.constants.get(name)
    }

    /// Whether object keys may be written without quotes.
    pub fn allows_unquoted_keys(&self) -> bool {
        self.unquoted_keys
    }

    /// Whether a comma may directly precede `}`, `]` or `)`.
    pub fn allows_trailing_commas(&self) -> bool {
        self.trailing_commas
    }

    /// Whether this registry has no keyed hooks.
    pub fn is_restricted(&self) -> bool {
        self.keyed.is_empty()
    }

    /// Runs the keyed hook selected by the first key of `doc`, returning the plain document
    /// when no hook matches. Nested values are left as they are.
    pub fn interpret(&self, doc: Document) -> Result<Bson> {
        let Some(hook_key) = doc.first_key().map(str::to_string) else {
            return Ok(Bson::Document(doc));
        };
        match self.keyed_hook(&hook_key) {
            Some(hook) => {
                tracing::trace!(hook = %hook_key, "interpreting decoded document");
                let raw = doc.to_string();
                hook(doc).map_err(|e| e.into_invalid_literal(&hook_key, raw.as_bytes()))
            }
            None => Ok(Bson::Document(doc)),
        }
    }

    pub(crate) fn dispatch(&self, key: &str, hook: KeyedHook, body: Document) -> Result<Bson> {
        tracing::trace!(hook = %key, fields = body.len(), "dispatching keyed hook");
        hook(body)
    }
}

/// Assembles a [`Registry`]. Registering the same key, constructor or constant twice panics:
/// registration happens once at start-up and a clash is a programming error.
///
/// ```
/// use mongoextjson::{
///     extjson::registry::RegistryBuilder,
///     Bson,
///     Document,
/// };
///
/// fn answer(_: Document) -> mongoextjson::error::Result<Bson> {
///     Ok(Bson::Int32(42))
/// }
///
/// let registry = RegistryBuilder::new()
///     .keyed("$answer", answer)
///     .constructor("Answer", "$answer", &[])
///     .build();
/// let value = mongoextjson::decode_with(b"[Answer(), {\"$answer\": 0}]", &registry)?;
/// assert_eq!(value, Bson::Array(vec![Bson::Int32(42), Bson::Int32(42)]));
/// # Ok::<(), mongoextjson::error::Error>(())
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    keyed: HashMap<String, KeyedHook, RandomState>,
    constructors: HashMap<String, Constructor, RandomState>,
    constants: HashMap<String, Bson, RandomState>,
    unquoted_keys: bool,
    trailing_commas: bool,
}

impl RegistryBuilder {
    /// An empty builder accepting strict JSON syntax only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` for objects whose first key is `key`.
    pub fn keyed(mut self, key: impl Into<String>, hook: KeyedHook) -> Self {
        let key = key.into();
        if self.keyed.insert(key.clone(), hook).is_some() {
            panic!("keyed hook {key:?} registered twice");
        }
        self
    }

    /// Registers the constructor `name`, rewritten to an object keyed by `key` whose fields are
    /// named by `args`.
    pub fn constructor(mut self, name: impl Into<String>, key: impl Into<String>, args: &[&str]) -> Self {
        let name = name.into();
        let constructor = Constructor {
            key: key.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        };
        if self.constructors.insert(name.clone(), constructor).is_some() {
            panic!("constructor {name:?} registered twice");
        }
        self
    }

    /// Registers the bare identifier `name` as the constant `value`.
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Bson>) -> Self {
        let name = name.into();
        if matches!(name.as_str(), "true" | "false" | "null" | "new") {
            panic!("{name:?} is reserved and cannot be registered as a constant");
        }
        if self.constants.insert(name.clone(), value.into()).is_some() {
            panic!("constant {name:?} registered twice");
        }
        self
    }

    /// Accept object keys written as bare identifiers.
    pub fn unquoted_keys(mut self, allow: bool) -> Self {
        self.unquoted_keys = allow;
        self
    }

    /// Accept a comma directly before a closing bracket.
    pub fn trailing_commas(mut self, allow: bool) -> Self {
        self.trailing_commas = allow;
        self
    }

    /// Freezes the builder.
    pub fn build(self) -> Registry {
        let restricted = (!self.keyed.is_empty()).then(|| {
            Box::new(Registry {
                keyed: HashMap::default(),
                constructors: self.constructors.clone(),
                constants: self.constants.clone(),
                unquoted_keys: self.unquoted_keys,
                trailing_commas: self.trailing_commas,
                restricted: None,
            })
        });

        tracing::debug!(
            keyed = self.keyed.len(),
            constructors = self.constructors.len(),
            constants = self.constants.len(),
            "extended JSON registry built"
        );

        Registry {
            keyed: self.keyed,
            constructors: self.constructors,
            constants: self.constants,
            unquoted_keys: self.unquoted_keys,
            trailing_commas: self.trailing_commas,
            restricted,
        }
    }
}

