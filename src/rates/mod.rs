//! Monthly growth rates for fixed-income products and equities

mod fixed_income;
mod growth;
mod instrument;
mod provider;
mod resolver;
mod twelve_data;

pub use fixed_income::{FixedIncomeTable, DEFAULT_RATE_TABLE_PATH};
pub use growth::{average_period_growth, GrowthShortfall};
pub use instrument::{InstrumentDescriptor, InstrumentType};
pub use provider::{PriceHistoryProvider, PriceObservation, StaticPriceHistory};
pub use resolver::{RateResolution, RateResolver};
pub use twelve_data::TwelveDataProvider;
