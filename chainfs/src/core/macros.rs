// SPDX-License-Identifier: MIT

/// Wires the layered error enums of this crate together.
///
/// - `top`: each layer error converts into its variant of the top-level error.
/// - `layers`: each layer error accepts a `&'static str` as `Other`, gets a
///   `Display` printing `msg()`, then `detail()`, then the `caused by:` chain
///   of `source()`, and implements `std::error::Error`.
/// - `lift`: store errors convert into the listed `Layer::Variant`s.
#[macro_export]
macro_rules! fs_error_wiring {
    (
        top => $top:ty {
            $($layer:ty : $variant:ident),+ $(,)?
        },
        layers => [ $($chained:ty),* $(,)? ],
        lift => {
            $($low:ty => [ $($dst:ident::$dst_variant:ident),+ ]),* $(,)?
        } $(,)?
    ) => {
        $(
            impl From<$layer> for $top {
                #[inline]
                fn from(e: $layer) -> Self { <$top>::$variant(e) }
            }
        )+

        impl From<&'static str> for $top {
            #[inline]
            fn from(msg: &'static str) -> Self { <$top>::Other(msg) }
        }

        $( $crate::__wire_layer!{ $chained } )*

        $( $(
            impl From<$low> for $dst {
                #[inline]
                fn from(e: $low) -> Self { <$dst>::$dst_variant(e) }
            }
        )+ )*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_layer {
    ($t:ty) => {
        impl From<&'static str> for $t {
            #[inline]
            fn from(msg: &'static str) -> Self {
                <$t>::Other(msg)
            }
        }

        impl ::std::fmt::Display for $t {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.msg())?;
                self.detail(f)?;
                let mut current = self.source();
                while let Some(src) = current {
                    write!(f, "\n  caused by: {src}")?;
                    current = src.source();
                }
                Ok(())
            }
        }

        impl ::std::error::Error for $t {}
    };
}

/// Returns early with `$err.into()` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
}
