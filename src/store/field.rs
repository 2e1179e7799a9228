//! Field selectors.
//!
//! A [`Field`] names one member of a record type: its byte offset, which keys
//! the listener registry, and a pair of typed accessors used to read and
//! write the member without any pointer arithmetic.
//!
//! Selectors are normally generated by [`config_fields!`](crate::config_fields),
//! which emits one associated constant per member.

use core::mem::size_of;

/// Typed selector for a field of type `F` inside record type `T`.
pub struct Field<T, F> {
    offset: usize,
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Field<T, F> {
    /// Creates a selector from an offset and an accessor pair.
    ///
    /// The offset must be the member's real offset (use
    /// [`core::mem::offset_of!`]); the accessors must return that same member.
    ///
    /// # Panics
    /// Panics (at compile time when used in a `const`) if the field would
    /// extend past the end of the record.
    pub const fn new(offset: usize, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        assert!(
            offset + size_of::<F>() <= size_of::<T>(),
            "field lies outside the record"
        );
        Self {
            offset,
            get,
            get_mut,
        }
    }

    /// Byte offset of the field within the record.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the field in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        size_of::<F>()
    }

    /// Borrows the field out of `record`.
    #[inline]
    pub fn get<'a>(&self, record: &'a T) -> &'a F {
        (self.get)(record)
    }

    /// Mutably borrows the field out of `record`.
    #[inline]
    pub fn get_mut<'a>(&self, record: &'a mut T) -> &'a mut F {
        (self.get_mut)(record)
    }
}

impl<T, F> Clone for Field<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for Field<T, F> {}

impl<T, F> core::fmt::Debug for Field<T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Field")
            .field("offset", &self.offset)
            .field("size", &self.size())
            .finish()
    }
}

/// Declares a record struct and one [`Field`] selector constant per member.
///
/// Each selector is named after its member in upper case.
///
/// ```
/// use seqlock_config::config_fields;
///
/// config_fields! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub struct Audio {
///         pub volume: i32,
///         pub brightness: f32,
///     }
/// }
///
/// let mut audio = Audio { volume: 50, brightness: 0.75 };
/// *Audio::VOLUME.get_mut(&mut audio) = 80;
/// assert_eq!(audio.volume, 80);
/// assert_eq!(Audio::BRIGHTNESS.offset(), core::mem::offset_of!(Audio, brightness));
/// ```
#[macro_export]
macro_rules! config_fields {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        $crate::__paste! {
            #[allow(dead_code)]
            impl $name {
                $(
                    #[doc = "Selector for the `" $field "` field."]
                    $vis const [<$field:upper>]: $crate::store::Field<$name, $ty> = {
                        fn get(record: &$name) -> &$ty {
                            &record.$field
                        }
                        fn get_mut(record: &mut $name) -> &mut $ty {
                            &mut record.$field
                        }
                        $crate::store::Field::new(::core::mem::offset_of!($name, $field), get, get_mut)
                    };
                )*
            }
        }
    };
}
