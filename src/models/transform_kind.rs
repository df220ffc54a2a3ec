//! Catalog of transforms the external engine understands.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    ToGray,
    Invert,
    ToBinary,
    Exponential,
    HistEqualize,
    Rotate,
    Resize,
    Translate,
    Mirror,
    Stretch,
    Add,
    Sub,
    Mul,
    Div,
    MeanFilter,
    GaussianFilter,
    MedianFilter,
    Sobel,
    Roberts,
    Prewitt,
    Laplacian,
    SobelSharpen,
    PrewittSharpen,
    LaplacianSharpen,
    RobertsSharpen,
    Dft,
    DftNonShifted,
    DftNoLog,
    Idft,
    IdftNonShifted,
    ShiftToCenter,
    Homomorphic,
    DftIdft,
    FourierDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transform: {0}")]
pub struct UnknownTransform(pub String);

impl TransformKind {
    pub const ALL: &'static [TransformKind] = &[
        Self::ToGray,
        Self::Invert,
        Self::ToBinary,
        Self::Exponential,
        Self::HistEqualize,
        Self::Rotate,
        Self::Resize,
        Self::Translate,
        Self::Mirror,
        Self::Stretch,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::MeanFilter,
        Self::GaussianFilter,
        Self::MedianFilter,
        Self::Sobel,
        Self::Roberts,
        Self::Prewitt,
        Self::Laplacian,
        Self::SobelSharpen,
        Self::PrewittSharpen,
        Self::LaplacianSharpen,
        Self::RobertsSharpen,
        Self::Dft,
        Self::DftNonShifted,
        Self::DftNoLog,
        Self::Idft,
        Self::IdftNonShifted,
        Self::ShiftToCenter,
        Self::Homomorphic,
        Self::DftIdft,
        Self::FourierDescriptor,
    ];

    /// Wire id passed to the engine.
    pub fn id(self) -> &'static str {
        match self {
            Self::ToGray => "color/to_gray",
            Self::Invert => "color/invert",
            Self::ToBinary => "color/to_binary",
            Self::Exponential => "color/exponential",
            Self::HistEqualize => "color/hist_equalize",
            Self::Rotate => "geometric/rotate",
            Self::Resize => "geometric/resize",
            Self::Translate => "geometric/translate",
            Self::Mirror => "geometric/mirror",
            Self::Stretch => "geometric/stretch",
            Self::Add => "binary_op/add",
            Self::Sub => "binary_op/sub",
            Self::Mul => "binary_op/mul",
            Self::Div => "binary_op/div",
            Self::MeanFilter => "filter/mean",
            Self::GaussianFilter => "filter/gaussian",
            Self::MedianFilter => "filter/median",
            Self::Sobel => "filter/sobel",
            Self::Roberts => "filter/roberts",
            Self::Prewitt => "filter/prewitt",
            Self::Laplacian => "filter/laplacian",
            Self::SobelSharpen => "filter/sobel_sharpen",
            Self::PrewittSharpen => "filter/prewitt_sharpen",
            Self::LaplacianSharpen => "filter/laplacian_sharpen",
            Self::RobertsSharpen => "filter/roberts_sharpen",
            Self::Dft => "fft/dft",
            Self::DftNonShifted => "fft/dft_non_shifted",
            Self::DftNoLog => "fft/dft_no_log",
            Self::Idft => "fft/idft",
            Self::IdftNonShifted => "fft/idft_non_shifted",
            Self::ShiftToCenter => "fft/shift_to_center",
            Self::Homomorphic => "fft/homomorphic",
            Self::DftIdft => "fft/dft_idft",
            Self::FourierDescriptor => "fourier_desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ToGray => "grayscale",
            Self::Invert => "invert",
            Self::ToBinary => "binarize",
            Self::Exponential => "exponential",
            Self::HistEqualize => "histogram equalization",
            Self::Rotate => "rotate",
            Self::Resize => "resize",
            Self::Translate => "translate",
            Self::Mirror => "mirror",
            Self::Stretch => "stretch",
            Self::Add => "add",
            Self::Sub => "subtract",
            Self::Mul => "multiply",
            Self::Div => "divide",
            Self::MeanFilter => "mean filter",
            Self::GaussianFilter => "gaussian filter",
            Self::MedianFilter => "median filter",
            Self::Sobel => "sobel",
            Self::Roberts => "roberts",
            Self::Prewitt => "prewitt",
            Self::Laplacian => "laplacian",
            Self::SobelSharpen => "sobel sharpen",
            Self::PrewittSharpen => "prewitt sharpen",
            Self::LaplacianSharpen => "laplacian sharpen",
            Self::RobertsSharpen => "roberts sharpen",
            Self::Dft => "DFT",
            Self::DftNonShifted => "non-shifted DFT",
            Self::DftNoLog => "DFT without log scaling",
            Self::Idft => "iDFT",
            Self::IdftNonShifted => "non-shifted iDFT",
            Self::ShiftToCenter => "shift to center",
            Self::Homomorphic => "homomorphic filter",
            Self::DftIdft => "DFT+iDFT",
            Self::FourierDescriptor => "fourier descriptor",
        }
    }

    /// Argument format the engine expects, or `None` when the kind takes no arguments.
    pub fn arg_hint(self) -> Option<&'static str> {
        match self {
            Self::ToBinary => Some("threshold: x (normalized, 0-1)"),
            Self::Exponential => Some("exponent: x (float)"),
            Self::Rotate => Some("angle in degrees: x"),
            Self::Resize => Some("target size in pixels: x,y"),
            Self::Translate => Some("offset in pixels: x,y"),
            Self::Mirror => Some("axis: x or y"),
            Self::Stretch => Some("scale factors: x,y"),
            Self::MeanFilter | Self::MedianFilter => Some("kernel size: k (odd)"),
            Self::GaussianFilter => Some("kernel size and sigma: k,s (k odd)"),
            Self::Sobel | Self::Prewitt | Self::SobelSharpen | Self::PrewittSharpen => {
                Some("direction: v or h")
            }
            Self::Roberts | Self::RobertsSharpen => Some("direction: / or \\"),
            Self::Laplacian | Self::LaplacianSharpen => Some("neighbourhood: 4 or 8"),
            Self::Homomorphic => Some("r_l,r_h,c,d0 (floats, e.g. 0.3,2,2,10)"),
            Self::FourierDescriptor => Some("kept terms: n (e.g. 64)"),
            _ => None,
        }
    }

    pub fn takes_args(self) -> bool {
        self.arg_hint().is_some()
    }

    /// Binary operations combine the source with a second artifact.
    pub fn needs_secondary(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TransformKind {
    type Err = UnknownTransform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownTransform(s.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/transform_kind.rs"]
mod tests;
