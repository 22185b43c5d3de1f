// SPDX-License-Identifier: MIT
//
// multispin-term: terminal layer for multispin.
//
// Everything that knows about the terminal lives here: the byte encoding of
// the handful of escape sequences an inline spinner block needs, a frame
// buffer so each frame is one write, the sink abstraction the engine draws
// into, the probes that decide whether to animate at all, and the restore
// hooks that run on Ctrl-C.
//
// Raw ANSI and termios, no TUI framework: the block is a few lines in the
// scroll-back, not a full-screen application.

pub mod ansi;
pub mod color;
pub mod interrupt;
pub mod output;
pub mod sink;
pub mod terminal;
