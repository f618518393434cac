//! GOGDB data dumps: discovery, parsing and download.
//!
//! A dump root is a directory named `gogdb_YYYY-MM-DD` holding
//! `products/<id>/product.json` and, optionally, `products/<id>/prices.json`.

pub mod dump;
pub mod error;
pub mod fetch;
pub mod prices;

pub use dump::{
    DumpProduct, dump_date, find_valid_dump_root, is_valid_dump_root, list_product_dirs,
    read_product,
};
pub use error::GogdbError;
pub use fetch::{
    BACKUP_INDEX_URL, DownloadProgress, FetchOptions, NoDownloadProgress, fetch_latest_dump,
    unpack_dump,
};
pub use prices::{PriceParse, parse_prices};
