//! Helper macro for declaring port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Build the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( {
                    $(
                        #[doc = concat!("`", stringify!($field), "` detail.")]
                        $field : $ty
                    ),*
                } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor coverage for the port error macro.
    define_port_error! {
        pub enum SamplePortError {
            Closed => "port closed",
            Refused { message: String } => "refused: {message}",
            Throttled { retry_after_ms: u64 } => "throttled for {retry_after_ms}ms",
            Rejected { message: String, code: u16 } => "rejected ({code}): {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::closed().to_string(), "port closed");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::refused("busy");
        assert_eq!(err.to_string(), "refused: busy");
    }

    #[test]
    fn non_string_fields_keep_their_types() {
        let err = SamplePortError::throttled(250_u64);
        assert_eq!(err.to_string(), "throttled for 250ms");
    }

    #[test]
    fn mixed_fields_are_supported() {
        let err = SamplePortError::rejected("quota", 429_u16);
        assert_eq!(err.to_string(), "rejected (429): quota");
    }
}
