use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
    #[error("DER: empty input")]
    EmptyInput,
    #[error("DER: high tag number form is not supported (identifier 0x{0:02x})")]
    HighTagNumber(u8),
    #[error("DER: indefinite length is not allowed")]
    IndefiniteLength,
    #[error("DER: length field of {0} octets is too long")]
    LengthTooLong(usize),
    #[error("DER: length is not minimally encoded")]
    NonMinimalLength,
    #[error("DER: nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match err {
            nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::Parser(e.code),
        }
    }
}
