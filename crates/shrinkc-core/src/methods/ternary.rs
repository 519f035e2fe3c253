//! `ternary`: border-flanked `a ? b : c` rewritten to `b`, then to `c`.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::patterns::{border_flanked, match_ternary};
use crate::trial::{attempt, TrialRunner};

/// `ternary`.
pub struct Ternary;

impl Method for Ternary {
    fn id(&self) -> MethodId {
        MethodId::Ternary
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        let Some(m) = match_ternary(buf.as_bytes(), *pos) else {
            return Ok(false);
        };
        if !border_flanked(buf.as_bytes(), *pos, m.end) {
            return Ok(false);
        }

        let b_text = buf.slice(m.b.0, m.b.1).to_vec();
        let worked_b = attempt(buf, runner, self.id(), false, *pos, m.end, &b_text)?;
        stats.record(worked_b);
        if worked_b {
            return Ok(true);
        }

        let c_text = buf.slice(m.c.0, m.c.1).to_vec();
        let worked_c = attempt(buf, runner, self.id(), false, *pos, m.end, &c_text)?;
        stats.record(worked_c);
        Ok(worked_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectFirst {
        seen: usize,
    }
    impl TrialRunner for RejectFirst {
        fn try_commit(&mut self, _c: &Buffer, _m: MethodId, _o: bool) -> Result<bool, CoreError> {
            self.seen += 1;
            Ok(self.seen > 1)
        }
        fn sanity_check(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    struct AcceptAll;
    impl TrialRunner for AcceptAll {
        fn try_commit(&mut self, _c: &Buffer, _m: MethodId, _o: bool) -> Result<bool, CoreError> {
            Ok(true)
        }
        fn sanity_check(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[test]
    fn ternary_takes_b_branch_first() {
        let mut buf = Buffer::from_bytes(b" a ? b : c ; X ".to_vec());
        let pos = buf.to_string_lossy().find('a').unwrap();
        let mut pos = pos;
        let mut stats = MethodStats::default();
        let worked = Ternary.try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats).unwrap();
        assert!(worked);
        assert_eq!(buf.to_string_lossy(), " b ; X ");
    }

    #[test]
    fn ternary_falls_back_to_c_branch() {
        let mut buf = Buffer::from_bytes(b" a ? b : c ; X ".to_vec());
        let mut pos = buf.to_string_lossy().find('a').unwrap();
        let mut stats = MethodStats::default();
        let mut runner = RejectFirst { seen: 0 };
        let worked = Ternary.try_at(&mut buf, &mut pos, &mut runner, &mut stats).unwrap();
        assert!(worked);
        assert_eq!(buf.to_string_lossy(), " c ; X ");
    }
}
