use std::collections::VecDeque;

const CAPACITY: usize = 8;
const CODE: &str = "dev";

/// Rolling buffer of the latest letters typed on the menu.
#[derive(Clone, Debug, Default)]
pub(crate) struct CheatBuffer {
    keys: VecDeque<char>,
}

impl CheatBuffer {
    /// Records a key press and reports whether the buffer now ends with the code.
    ///
    /// Keys outside `a-z` are ignored after lowercasing.
    pub(crate) fn push(&mut self, key: char) -> bool {
        let key = key.to_ascii_lowercase();
        if !key.is_ascii_lowercase() {
            return false;
        }
        if self.keys.len() == CAPACITY {
            let _ = self.keys.pop_front();
        }
        self.keys.push_back(key);

        self.keys.len() >= CODE.len()
            && self
                .keys
                .iter()
                .skip(self.keys.len() - CODE.len())
                .copied()
                .eq(CODE.chars())
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_at_end_of_buffer() {
        let mut buffer = CheatBuffer::default();
        assert!(!buffer.push('x'));
        assert!(!buffer.push('D'));
        assert!(!buffer.push('e'));
        assert!(buffer.push('V'));
    }

    #[test]
    fn non_letters_are_ignored() {
        let mut buffer = CheatBuffer::default();
        assert!(!buffer.push('d'));
        assert!(!buffer.push('1'));
        assert!(!buffer.push('e'));
        assert!(buffer.push('v'));
    }

    #[test]
    fn buffer_keeps_last_eight_letters() {
        let mut buffer = CheatBuffer::default();
        for key in "abcdefghijk".chars() {
            let _ = buffer.push(key);
        }
        assert_eq!(buffer.keys.len(), CAPACITY);
        assert_eq!(buffer.keys.front(), Some(&'d'));

        buffer.clear();
        assert!(!buffer.push('e'));
        assert!(!buffer.push('v'));
    }
}
