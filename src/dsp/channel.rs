//! AIS channel splitter.
//!
//! With the front-end tuned to 162.000 MHz, AIS channel 1
//! (161.975 MHz) sits at -25 kHz in the baseband and AIS channel 2
//! (162.025 MHz) at +25 kHz. At the 100 kHz intermediate rate, 25 kHz
//! is a quarter turn per sample, so both mixes reduce to sign and
//! component swaps repeating with period 4:
//!
//! | i mod 4 | channel 2 from (I, Q) | channel 1 adjust |
//! |---------|-----------------------|------------------|
//! | 0       | ( I,  Q)              | unchanged        |
//! | 1       | ( Q, -I)              | negated          |
//! | 2       | (-I, -Q)              | unchanged        |
//! | 3       | (-Q,  I)              | negated          |
//!
//! Channel 2 is the input rotated by -25 kHz; the adjust column then
//! rotates channel 1 the remaining -50 kHz (half a turn per two
//! samples), centering each channel at DC. The phase origin of the
//! mix is arbitrary; the frame locator's dual-polarity scan absorbs it.

/// Derive the channel-2 stream from channel 1 and re-center channel 1,
/// over the first `n` samples.
///
/// Every assignment in the table above is load-bearing: one wrong sign
/// leaves a channel off-center by 50 kHz.
pub fn split(i1: &mut [i32], q1: &mut [i32], i2: &mut [i32], q2: &mut [i32], n: usize) {
    let n = n - n % 4;
    for k in (0..n).step_by(4) {
        i2[k] = i1[k];
        q2[k] = q1[k];
        i2[k + 1] = q1[k + 1];
        q2[k + 1] = -i1[k + 1];
        i2[k + 2] = -i1[k + 2];
        q2[k + 2] = -q1[k + 2];
        i2[k + 3] = -q1[k + 3];
        q2[k + 3] = i1[k + 3];

        i1[k + 1] = -i2[k + 1];
        q1[k + 1] = -q2[k + 1];
        i1[k + 2] = i2[k + 2];
        q1[k + 2] = q2[k + 2];
        i1[k + 3] = -i2[k + 3];
        q1[k + 3] = -q2[k + 3];
    }
}
