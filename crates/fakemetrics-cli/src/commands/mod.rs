pub(crate) mod describe;
pub(crate) mod run;
