//! Innovation laws and volatility models.
//!
//! ## Architecture
//!
//! ```text
//! ModelParameters
//! ├── ShapeParams   (alpha, theta, beta(t), gamma(t))  -> NtsShape per step
//! ├── GarchParams   (kappa, xi, lambda, zeta, sigma0)  -> GarchVolatility
//! └── spot, y0
//!
//! InnovationLaw = InnovationSampler + CharacteristicExponent
//! ├── StdNts            (production law)
//! └── StandardNormalLaw (Gaussian reference law)
//! ```

pub mod garch;
pub mod law;
pub mod nts;
pub mod params;

pub use garch::GarchVolatility;
pub use law::{CharacteristicExponent, InnovationLaw, InnovationSampler, StandardNormalLaw};
pub use nts::StdNts;
pub use params::{GarchParams, ModelParameters, NtsShape, ShapeParams};
