pub mod align;
pub mod butterworth;
pub mod filtfilt;
pub mod lowpass;

pub use align::{align, Alignment, DEFAULT_MAX_LAG};
pub use butterworth::{Butterworth, FilterDesign, TransferFunction, MAX_ORDER};
pub use filtfilt::{filtfilt, lfilter, lfilter_zi};
pub use lowpass::{lowpass, FilterParams, LowPassFilter};
