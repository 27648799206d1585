//! # `managed_client!`
//!
//! Generates a typed facade over a [`ProxyAdapter`](crate::clients::ProxyAdapter):
//! the client struct, its [`InterfaceShape`](crate::clients::InterfaceShape) and
//! one typed method per declared member.
//!
//! ```rust
//! use managed_recipe::framework::DispatchError;
//! use managed_recipe::managed_client;
//!
//! #[derive(Debug, thiserror::Error)]
//! pub enum PumpError {
//!     #[error(transparent)]
//!     Dispatch(#[from] DispatchError),
//! }
//!
//! managed_client! {
//!     /// Client for a pump.
//!     pub struct PumpClient for "PumpApi" {
//!         error: PumpError;
//!         read pressure: i64;
//!         write pressure: i64;
//!         invoke prime(seconds: i64) -> bool;
//!     }
//! }
//!
//! let shape = PumpClient::shape();
//! let names: Vec<_> = shape.methods().iter().map(|m| m.name.as_str()).collect();
//! assert_eq!(names, vec!["get_pressure", "set_pressure", "prime"]);
//! ```
//!
//! `read x` becomes `get_x`, `write x` becomes `set_x`, and `invoke op(..)` keeps
//! its name. The error type must implement `From<DispatchError>`.

#[macro_export]
macro_rules! managed_client {
    (
        $(#[$meta:meta])*
        $vis:vis struct $client:ident for $shape:literal {
            error: $error:ty;
            $( read $attr:ident : $attr_ty:ty; )*
            $( write $wattr:ident : $wattr_ty:ty; )*
            $( invoke $op:ident ( $( $arg:ident : $arg_ty:ty ),* $(,)? ) -> $ret:ty; )*
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[derive(Clone, Debug)]
            $vis struct $client {
                proxy: $crate::clients::ProxyAdapter,
            }

            impl $client {
                /// The interface this client routes through.
                pub fn shape() -> $crate::clients::InterfaceShape {
                    $crate::clients::InterfaceShape::new($shape)
                        $(
                            .method(
                                stringify!([<get_ $attr>]),
                                &[],
                                <$attr_ty as $crate::framework::Typed>::value_type(),
                            )
                        )*
                        $(
                            .method(
                                stringify!([<set_ $wattr>]),
                                &[{ <$wattr_ty as $crate::framework::Typed>::value_type() }],
                                $crate::framework::ValueType::Unit,
                            )
                        )*
                        $(
                            .method(
                                stringify!($op),
                                &[$( { <$arg_ty as $crate::framework::Typed>::value_type() } ),*],
                                <$ret as $crate::framework::Typed>::value_type(),
                            )
                        )*
                }

                pub fn new(access: ::std::sync::Arc<dyn $crate::framework::ManagedAccess>) -> Self {
                    Self {
                        proxy: $crate::clients::ProxyAdapter::new(access, &Self::shape()),
                    }
                }

                $(
                    pub fn [<get_ $attr>](&self) -> Result<$attr_ty, $error> {
                        <Self as $crate::clients::ManagedClient>::read(self, stringify!([<get_ $attr>]))
                    }
                )*

                $(
                    pub fn [<set_ $wattr>](&self, value: $wattr_ty) -> Result<(), $error> {
                        <Self as $crate::clients::ManagedClient>::write(self, stringify!([<set_ $wattr>]), value)
                    }
                )*

                $(
                    pub fn $op(&self, $( $arg: $arg_ty ),*) -> Result<$ret, $error> {
                        <Self as $crate::clients::ManagedClient>::call(
                            self,
                            stringify!($op),
                            vec![$( $crate::framework::IntoValue::into_value($arg) ),*],
                        )
                    }
                )*
            }

            impl $crate::clients::ManagedClient for $client {
                type Error = $error;

                fn proxy(&self) -> &$crate::clients::ProxyAdapter {
                    &self.proxy
                }

                fn map_error(e: $crate::framework::DispatchError) -> Self::Error {
                    <$error>::from(e)
                }
            }
        }
    };
}
