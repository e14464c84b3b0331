use crate::codec::{CodecError, Scalar, ScalarTag};

macro_rules! impl_numeric_scalars {
    ( @entries $( ($ty:ty, $tag:literal, numeric = $numeric:tt, sample = $sample:expr) ),* $(,)? ) => {
        $( impl_numeric_scalars!(@one $ty, $tag, $numeric); )*
    };
    (@one $ty:ty, $tag:literal, true) => {
        impl Scalar for $ty {
            const TAG: ScalarTag = ScalarTag::new($tag);

            fn encode(&self) -> String {
                self.to_string()
            }

            fn decode(text: &str) -> Result<Self, CodecError> {
                text.trim()
                    .parse::<Self>()
                    .map_err(|err| CodecError::malformed(Self::TAG, text, err))
            }
        }
    };
    (@one $ty:ty, $tag:literal, false) => {};
}

scalar_registry!(impl_numeric_scalars);

// KML writes booleans as 0/1 but readers in the wild also emit true/false.
impl Scalar for bool {
    const TAG: ScalarTag = ScalarTag::new("bool");

    fn encode(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }

    fn decode(text: &str) -> Result<Self, CodecError> {
        match text.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(CodecError::malformed(
                Self::TAG,
                text,
                "expected one of 1, 0, true, false",
            )),
        }
    }
}

impl Scalar for String {
    const TAG: ScalarTag = ScalarTag::new("string");

    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(text: &str) -> Result<Self, CodecError> {
        Ok(text.to_string())
    }
}
