//! Enumerated column domains.
//!
//! Every enumerated column is stored as `TEXT` guarded by a named `CHECK`
//! constraint, and the stored value is the human label (`"In Stock"`,
//! `"Batch Performance"`). The Rust enums here carry those exact labels, so
//! the label is what is serialized, bound into queries and parsed back.
//!
//! | Column | Domain |
//! |---|---|
//! | `batches.stage` | Egg, Larvae, Pupae, Adult |
//! | `batches.status`, `staff.status` | Active, Inactive |
//! | `products.category` | Larvae, Frass, Pupae, Other |
//! | `inventory.status` | In Stock, Out of Stock, Pending |
//! | `transactions.payment_method` | Cash, Card, Transfer |
//! | `transactions.payment_status` | Completed, Pending, Failed |
//! | `reports.report_type` | Batch Performance, Sales, Inventory, Mortality |

/// Error returned when a label is outside an enumerated domain.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {domain} value: {value:?}")]
pub struct ParseEnumError {
    /// Name of the domain that rejected the value (e.g. `batch stage`).
    pub domain: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Define an enum whose variants map one-to-one to stored text labels.
///
/// Generates `as_str`, `ALL`, `Display`, `FromStr`, serde support using the
/// labels, and (with the `postgres` feature) `sqlx` support as `TEXT`.
/// Parsing is exact: `"Larva"` is not `"Larvae"`.
///
/// # Example
///
/// ```rust
/// # use bsf_core::define_text_enum;
/// define_text_enum! {
///     /// Light cycle of a grow room.
///     "light cycle" LightCycle {
///         Day => "Day",
///         Night => "Night",
///     }
/// }
///
/// assert_eq!(LightCycle::Night.as_str(), "Night");
/// assert!("Dusk".parse::<LightCycle>().is_err());
/// ```
#[macro_export]
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $domain:literal $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the domain, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The label stored in the database.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::ParseEnumError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    _ => Err($crate::ParseEnumError {
                        domain: $domain,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <&str as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <&str as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let label = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(label.parse::<Self>()?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

define_text_enum! {
    /// Life stage of a batch.
    ///
    /// Stages only move forward: Egg, Larvae, Pupae, Adult.
    #[derive(Default)]
    "batch stage" BatchStage {
        #[default]
        Egg => "Egg",
        Larvae => "Larvae",
        Pupae => "Pupae",
        Adult => "Adult",
    }
}

impl BatchStage {
    /// Position along the life cycle, `Egg` first.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Egg => 0,
            Self::Larvae => 1,
            Self::Pupae => 2,
            Self::Adult => 3,
        }
    }

    /// Returns `true` if moving from `self` to `to` does not go backwards.
    #[must_use]
    pub const fn can_move_to(self, to: Self) -> bool {
        to.ordinal() >= self.ordinal()
    }

    /// The stage that follows this one, or `None` for adults.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Egg => Some(Self::Larvae),
            Self::Larvae => Some(Self::Pupae),
            Self::Pupae => Some(Self::Adult),
            Self::Adult => None,
        }
    }
}

define_text_enum! {
    /// Whether a batch or staff member is still active.
    #[derive(Default)]
    "activity status" ActivityStatus {
        #[default]
        Active => "Active",
        Inactive => "Inactive",
    }
}

impl ActivityStatus {
    /// Returns `true` for [`ActivityStatus::Active`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

define_text_enum! {
    /// Catalog category of a product.
    "product category" ProductCategory {
        Larvae => "Larvae",
        Frass => "Frass",
        Pupae => "Pupae",
        Other => "Other",
    }
}

define_text_enum! {
    /// Stock status of an inventory item.
    #[derive(Default)]
    "inventory status" InventoryStatus {
        #[default]
        InStock => "In Stock",
        OutOfStock => "Out of Stock",
        Pending => "Pending",
    }
}

define_text_enum! {
    /// How a sale was paid.
    "payment method" PaymentMethod {
        Cash => "Cash",
        Card => "Card",
        Transfer => "Transfer",
    }
}

define_text_enum! {
    /// Outcome of a payment attempt.
    #[derive(Default)]
    "payment status" PaymentStatus {
        Completed => "Completed",
        #[default]
        Pending => "Pending",
        Failed => "Failed",
    }
}

define_text_enum! {
    /// Kind of analytics snapshot stored in `reports`.
    "report type" ReportType {
        BatchPerformance => "Batch Performance",
        Sales => "Sales",
        Inventory => "Inventory",
        Mortality => "Mortality",
    }
}
