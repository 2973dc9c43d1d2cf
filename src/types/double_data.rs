/// Four doubles, nothing else.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DoubleData {
    pub a: [f64; 4],
}
