/// Digital Signal Processing (DSP) module.
///
/// Integer building blocks for the AIS receive chain, operating on
/// paired I/Q streams of `i32` samples:
///
/// - `fir`: symmetric FIR kernels and in-place decimation.
/// - `channel`: splitting the 100 kHz baseband into the two AIS channels.
/// - `demod`: FM discrimination and instantaneous power estimation.
///
/// All stages work on caller-owned scratch buffers and never allocate;
/// the receiver reuses one working set across input buffers.
pub mod channel;
pub mod demod;
pub mod fir;
