use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::Method;
use crate::error::{Error, ErrorKind};

impl FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "store" | "stored" | "none" => Ok(Method::Stored),
            "deflate" | "deflated" => Ok(Method::Deflated),
            _ => exn::bail!(ErrorKind::UnsupportedMethod(s.to_string())),
        }
    }
}
impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Method::Stored => write!(f, "stored"),
            Method::Deflated => write!(f, "deflated"),
        }
    }
}
impl From<Method> for zip::CompressionMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Stored => zip::CompressionMethod::Stored,
            Method::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Method;
    use rstest::rstest;

    #[rstest]
    #[case("store", Method::Stored)]
    #[case("stored", Method::Stored)]
    #[case("none", Method::Stored)]
    #[case("STORED", Method::Stored)]
    #[case("deflate", Method::Deflated)]
    #[case(" Deflated ", Method::Deflated)]
    fn test_from_str(#[case] test: &str, #[case] expected: Method) {
        assert_eq!(test.parse::<Method>().unwrap(), expected);
    }

    #[rstest]
    #[case("bzip2")]
    #[case("zstd")]
    #[case("")]
    fn test_from_str_invalid(#[case] test: &str) {
        assert!(test.parse::<Method>().is_err());
    }

    #[rstest]
    #[case(Method::Stored)]
    #[case(Method::Deflated)]
    fn test_display_parses_back(#[case] method: Method) {
        assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
    }
}
