use hashbrown::HashMap;
use std::any::{Any, TypeId};
use std::fmt;

macro_rules! typed_var_map {
    ($(#[$meta:meta])* $name:ident, $($bound:tt)+) => {
        $(#[$meta])*
        #[derive(Default)]
        pub struct $name {
            vars: HashMap<TypeId, Box<dyn $($bound)+>>,
        }

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self::default()
            }

            /// Stores `value` under its type, returning the value previously stored for that
            /// type.
            pub fn insert<T: $($bound)+>(&mut self, value: T) -> Option<T> {
                self.vars
                    .insert(TypeId::of::<T>(), Box::new(value))
                    .and_then(|previous| {
                        let previous: Box<dyn Any> = previous;
                        previous.downcast::<T>().ok().map(|previous| *previous)
                    })
            }

            #[inline]
            pub fn get<T: $($bound)+>(&self) -> Option<&T> {
                self.vars
                    .get(&TypeId::of::<T>())
                    .and_then(|value| (**value).downcast_ref::<T>())
            }

            #[inline]
            pub fn get_mut<T: $($bound)+>(&mut self) -> Option<&mut T> {
                self.vars
                    .get_mut(&TypeId::of::<T>())
                    .and_then(|value| (**value).downcast_mut::<T>())
            }

            pub fn remove<T: $($bound)+>(&mut self) -> Option<T> {
                self.vars.remove(&TypeId::of::<T>()).and_then(|value| {
                    let value: Box<dyn Any> = value;
                    value.downcast::<T>().ok().map(|value| *value)
                })
            }

            #[inline]
            pub fn contains<T: $($bound)+>(&self) -> bool {
                self.vars.contains_key(&TypeId::of::<T>())
            }

            #[inline]
            pub fn len(&self) -> usize {
                self.vars.len()
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.vars.is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("len", &self.vars.len())
                    .finish()
            }
        }
    };
}

typed_var_map!(
    /// A heterogeneous map of context variables, keyed by the type of the stored value.
    ///
    /// Visitors use a dedicated type per variable (often a newtype such as
    /// `struct EnclosingField<'a>(&'a Field<'a>)`), which keeps every lookup statically typed.
    VarMap,
    Any
);

typed_var_map!(
    /// The thread-safe counterpart of [`VarMap`] used by parallel traversals, which only accepts
    /// values that may be shared across worker threads.
    SyncVarMap,
    Any + Send + Sync
);
