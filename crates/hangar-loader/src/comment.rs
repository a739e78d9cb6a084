// SPDX-License-Identifier: MIT

//! Comment-escape stage (§4.C stage 1): strip `#` to end-of-line unless
//! inside a quoted span. Multi-line quoted spans are out of scope (quote
//! state resets at each newline), matching the spec's stated scope.

pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for line in input.split_inclusive('\n') {
        out.push_str(&strip_line(line));
    }
    out
}

fn strip_line(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut in_single = false;
    let mut in_double = false;
    for c in line.chars() {
        match c {
            '\'' if !in_double => {
                in_single = !in_single;
                result.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                result.push(c);
            }
            '#' if !in_single && !in_double => {
                break;
            }
            '\n' => {
                result.push(c);
                break;
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
#[path = "comment_tests.rs"]
mod tests;
