//! Price data acquisition and normalization.

pub mod csv_prices;
pub mod download;
pub mod normalize;
pub mod provider;
pub mod yahoo;

pub use csv_prices::{write_price_csv, CsvPriceProvider};
pub use download::{fetch_universe, FetchedUniverse};
pub use normalize::{align_prices, apply_policy, CleanPrices, MissingDataPolicy, PriceField, PriceTable};
pub use provider::{
    DataError, DataProvider, DataSource, DownloadProgress, FetchResult, NoProgress, RawBar,
    StdoutProgress,
};
pub use yahoo::YahooProvider;
