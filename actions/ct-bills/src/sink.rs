use crate::error::Result;
use crate::types::Bill;
use std::io::Write;
use std::path::PathBuf;

/// Receives each finished bill exactly once
pub trait BillSink {
    fn save_bill(&mut self, bill: &Bill) -> Result<()>;
}

/// Writes one JSON document per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> BillSink for JsonLinesSink<W> {
    fn save_bill(&mut self, bill: &Bill) -> Result<()> {
        serde_json::to_writer(&mut self.writer, bill)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Writes `<dir>/<chamber>_<bill_id>.json`, one pretty-printed file per bill
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, bill: &Bill) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", bill.chamber, bill.bill_id))
    }
}

impl BillSink for DirectorySink {
    fn save_bill(&mut self, bill: &Bill) -> Result<()> {
        let json = serde_json::to_string_pretty(bill)?;
        std::fs::write(self.path_for(bill), json)?;
        Ok(())
    }
}
