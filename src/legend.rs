/*
 *  legend.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Legend label markup and widget stylesheet for the browser console
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use crate::chart::SeriesPayload;

/// Legend box + label. Hidden series get an empty, struck-out box.
pub fn label_markup(series: &SeriesPayload) -> String {
    let swatch = if series.show_line {
        format!(
            r#"<div class="legendLabelBoxFill" style="background-color:{}"></div>"#,
            series.color.css_hex()
        )
    } else {
        r#"<div class="legendLabelBoxUnused"></div>"#.to_string()
    };
    format!(r#"<div class="legendLabelBox">{}</div>{}"#, swatch, html_escape::encode_text(&series.label))
}

/// CSS for the chart container and the custom legend boxes
pub const STYLES: &str = r#"
  #chartContainer {
    height: 370px;
    width: 100%;
  }

  .legendColorBox {
    /* boxes are drawn by the label markup */
    display:none;
  }
  .legendLabel {
    cursor: pointer;
  }
  .legendLabelBox {
    display: inline-block;
    border: 1px solid #ccc;
    padding: 1px;
    height: 14px;
    width: 14px;
    vertical-align: middle;
    margin-right: 3px;
  }
  .legendLabelBoxFill {
    display:inline-block;
    width:10px;
    height:10px;
  }
  .legendLabelBoxUnused {
    width: 18px;
    height: 18px;
    border-bottom: 1px solid black;
    transform: translateY(-10px) translateX(-10px) rotate(-45deg);
    -ms-transform: translateY(-10px) translateX(-10px) rotate(-45deg);
    -moz-transform: translateY(-10px) translateX(-10px) rotate(-45deg);
    -webkit-transform: translateY(-10px) translateX(-10px) rotate(-45deg);
  }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn payload(show_line: bool) -> SeriesPayload {
        SeriesPayload {
            label: "Mic0 (back-left)".to_string(),
            color: Color::POWER,
            show_line,
            points: Vec::new(),
        }
    }

    #[test]
    fn test_visible_label_has_color_swatch() {
        let html = label_markup(&payload(true));
        assert!(html.contains("legendLabelBoxFill"));
        assert!(html.contains("background-color:#edc240"));
        assert!(html.ends_with("Mic0 (back-left)"));
    }

    #[test]
    fn test_hidden_label_is_struck_out() {
        let html = label_markup(&payload(false));
        assert!(html.contains("legendLabelBoxUnused"));
        assert!(!html.contains("background-color"));
    }

    #[test]
    fn test_label_is_escaped() {
        let mut p = payload(true);
        p.label = "<b>&".to_string();
        assert!(label_markup(&p).ends_with("&lt;b&gt;&amp;"));
    }

    #[test]
    fn test_styles_cover_legend_classes() {
        for class in [".legendLabel", ".legendLabelBox", ".legendLabelBoxFill", ".legendLabelBoxUnused", "#chartContainer"] {
            assert!(STYLES.contains(class), "missing {}", class);
        }
    }
}
