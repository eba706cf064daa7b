//! Elastic column alignment for struct field rows.
//!
//! Each row is a list of cells. Every cell but the last is terminated and
//! takes part in column alignment; the last cell is written as-is. A column
//! block is a run of consecutive rows that all have a terminated cell in that
//! column; its width is the widest cell plus one space of padding. Blocks
//! made only of empty cells collapse to zero width.

const PADDING: usize = 1;

/// Align `rows` and return one rendered line per row.
#[must_use]
pub fn align(rows: &[Vec<String>]) -> Vec<String> {
    let mut table = Table {
        rows,
        widths: Vec::new(),
        lines: Vec::with_capacity(rows.len()),
    };
    table.format(0, rows.len());
    table.lines
}

/// Displayed width of a cell; one per character.
fn text_width(cell: &str) -> usize {
    cell.chars().count()
}

struct Table<'a> {
    rows: &'a [Vec<String>],
    /// Widths of the enclosing column blocks, outermost first
    widths: Vec<usize>,
    lines: Vec<String>,
}

impl Table<'_> {
    fn has_column(&self, row: usize, column: usize) -> bool {
        column + 1 < self.rows[row].len()
    }

    fn format(&mut self, mut line0: usize, line1: usize) {
        let column = self.widths.len();
        let mut this = line0;

        while this < line1 {
            if !self.has_column(this, column) {
                this += 1;
                continue;
            }

            // Rows before the block only need the widths known so far
            self.write_lines(line0, this);
            line0 = this;

            let mut width = 0;
            let mut discardable = true;
            while this < line1 && self.has_column(this, column) {
                let cell_width = text_width(&self.rows[this][column]);
                width = width.max(cell_width + PADDING);
                if cell_width > 0 {
                    discardable = false;
                }
                this += 1;
            }
            if discardable {
                width = 0;
            }

            self.widths.push(width);
            self.format(line0, this);
            self.widths.pop();
            line0 = this;
        }

        self.write_lines(line0, line1);
    }

    fn write_lines(&mut self, line0: usize, line1: usize) {
        for row in &self.rows[line0..line1] {
            let mut line = String::new();
            for (j, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if let Some(&width) = self.widths.get(j) {
                    let pad = width.saturating_sub(text_width(cell));
                    line.push_str(&" ".repeat(pad));
                }
            }
            self.lines.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| (*c).to_owned()).collect())
            .collect()
    }

    #[test]
    fn test_aligns_types_and_tags() {
        let input = rows(&[
            &["Foo", "string", "`json:\"-\"`"],
            &["Bar", "map[int]interface{}", "`json:\"Bar\"`"],
            &["baz", "int"],
        ]);
        assert_eq!(
            align(&input),
            vec![
                "Foo string              `json:\"-\"`",
                "Bar map[int]interface{} `json:\"Bar\"`",
                "baz int",
            ]
        );
    }

    #[test]
    fn test_short_row_breaks_block() {
        let input = rows(&[
            &["A", "int", "`a`"],
            &["Embedded"],
            &["LongName", "string", "`b`"],
        ]);
        assert_eq!(
            align(&input),
            vec!["A int `a`", "Embedded", "LongName string `b`"]
        );
    }

    #[test]
    fn test_empty_column_is_discarded() {
        let input = rows(&[&["Emb", "", "// note"]]);
        assert_eq!(align(&input), vec!["Emb // note"]);
    }

    #[test]
    fn test_width_counts_characters() {
        let input = rows(&[&["É", "int"], &["Ab", "int"]]);
        assert_eq!(align(&input), vec!["É  int", "Ab int"]);
    }

    #[test]
    fn test_comment_lines_up_with_tag_column() {
        let input = rows(&[
            &["A", "int", "`json:\"A\"`"],
            &["Bee", "string", "// doc"],
        ]);
        assert_eq!(
            align(&input),
            vec!["A   int    `json:\"A\"`", "Bee string // doc"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(align(&[]).is_empty());
    }
}
