//! Label layout engine
//!
//! Pure coordinate computation: one recipient in, one page of draw commands
//! out. No I/O, no font access beyond the injected measurer, total over its
//! input domain (empty strings are valid everywhere).

use crate::schema::{
    DrawCommand, GreetingPosition, GreetingSettings, LogoSettings, PaperProfile, StampSettings,
};
use label_data::{RecipientRecord, SenderRecord};

/// Text measurement capability, supplied by the render backend
///
/// Stamp-box sizing and the greeting indent depend on rendered glyph widths,
/// so the engine cannot compute them from character counts. Tests inject a
/// deterministic stub; the PDF renderer injects real font metrics.
pub trait TextMeasurer {
    /// Width of `text` in millimeters when set at `size_pt`
    fn width_mm(&self, text: &str, size_pt: f32, bold: bool) -> f64;
}

/// Compute the draw commands for one page
///
/// Command order follows the paint order: logo, sender block, stamp box,
/// greeting, recipient block.
pub fn compute_page(
    profile: PaperProfile,
    sender: &SenderRecord,
    recipient: &RecipientRecord,
    stamp: &StampSettings,
    greeting: &GreetingSettings,
    logo: &LogoSettings,
    measurer: &dyn TextMeasurer,
) -> Vec<DrawCommand> {
    let m = profile.metrics();
    let page_width = m.geometry.width_mm;
    let page_height = m.geometry.height_mm;
    let margin = m.geometry.margin_mm;

    let mut commands = Vec::new();

    let sender_first_line_y = margin + m.sender_top_offset;

    // --- Logo, sitting above the first sender line with a fixed gap
    if logo.enabled && !logo.source_ref.is_empty() {
        let height = match logo.custom_height_mm {
            Some(h) if h > 0.0 => h,
            _ => m.logo_default_height,
        };
        let width = height * logo.aspect_ratio;

        commands.push(DrawCommand::Image {
            x: margin,
            y: sender_first_line_y - height - m.logo_gap,
            width,
            height,
            source_ref: logo.source_ref.clone(),
        });
    }

    // --- Sender block: document number bold, five regular lines after it.
    // Empty fields still occupy their line; the block is always six lines
    // tall.
    let mut sender_y = sender_first_line_y;
    for (i, line) in sender.lines().into_iter().enumerate() {
        commands.push(DrawCommand::Text {
            x: margin,
            y: sender_y,
            text: line.to_string(),
            size_pt: m.sender_size_pt,
            bold: i == 0,
        });
        sender_y += m.sender_line_spacing;
    }

    // --- Stamp box, sized to its text and right-aligned against the margin
    let stamp_text = stamp.effective_text();
    if !stamp_text.trim().is_empty() {
        let lines: Vec<&str> = stamp_text.split('\n').collect();

        let max_width = lines
            .iter()
            .map(|line| measurer.width_mm(line, m.stamp_size_pt, false))
            .fold(0.0_f64, f64::max);

        let box_width = max_width + m.stamp_padding_x * 2.0;
        let box_height = lines.len() as f64 * m.stamp_line_spacing + m.stamp_padding_y * 2.0;
        let box_x = page_width - margin - box_width;
        let box_y = margin - m.stamp_rise;

        commands.push(DrawCommand::Rect {
            x: box_x,
            y: box_y,
            width: box_width,
            height: box_height,
        });

        let mut line_y = box_y + m.stamp_padding_y + m.stamp_first_baseline;
        for line in lines {
            let line_width = measurer.width_mm(line, m.stamp_size_pt, false);
            commands.push(DrawCommand::Text {
                x: box_x + (box_width - line_width) / 2.0,
                y: line_y,
                text: line.to_string(),
                size_pt: m.stamp_size_pt,
                bold: false,
            });
            line_y += m.stamp_line_spacing;
        }
    }

    // --- Greeting and recipient block, anchored by page-size fractions
    let base_x = page_width * m.recipient_fx;
    let base_y = page_height * m.recipient_fy;

    let detail_x = if !greeting.text.is_empty() && greeting.position == GreetingPosition::Left {
        commands.push(DrawCommand::Text {
            x: base_x,
            y: base_y,
            text: greeting.text.clone(),
            size_pt: m.recipient_size_pt,
            bold: true,
        });
        let greeting_width = measurer.width_mm(&greeting.text, m.recipient_size_pt, true);
        base_x + greeting_width + m.greeting_gap
    } else {
        if !greeting.text.is_empty() {
            commands.push(DrawCommand::Text {
                x: base_x,
                y: base_y - m.recipient_line_spacing,
                text: greeting.text.clone(),
                size_pt: m.recipient_size_pt,
                bold: true,
            });
        }
        base_x
    };

    // Postal line uses its fixed offset rather than 3x the spacing; the
    // wider gap sets the postal code apart.
    let line_offsets = [
        0.0,
        m.recipient_line_spacing,
        m.recipient_line_spacing * 2.0,
        m.postal_offset,
    ];
    for (line, offset) in recipient.lines().into_iter().zip(line_offsets) {
        commands.push(DrawCommand::Text {
            x: detail_x,
            y: base_y + offset,
            text: line.to_string(),
            size_pt: m.recipient_size_pt,
            bold: true,
        });
    }

    commands
}

/// Compute one page of draw commands per recipient, in input order
pub fn compute_pages(
    profile: PaperProfile,
    sender: &SenderRecord,
    recipients: &[RecipientRecord],
    stamp: &StampSettings,
    greeting: &GreetingSettings,
    logo: &LogoSettings,
    measurer: &dyn TextMeasurer,
) -> Vec<Vec<DrawCommand>> {
    recipients
        .iter()
        .map(|recipient| compute_page(profile, sender, recipient, stamp, greeting, logo, measurer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Deterministic measurer: every character is 0.2 mm per point of size
    pub struct StubMeasurer;

    impl TextMeasurer for StubMeasurer {
        fn width_mm(&self, text: &str, size_pt: f32, _bold: bool) -> f64 {
            text.chars().count() as f64 * size_pt as f64 * 0.2
        }
    }

    fn sender() -> SenderRecord {
        label_data::example_sender()
    }

    fn recipient() -> RecipientRecord {
        label_data::example_recipients().remove(0)
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&DrawCommand> {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .collect()
    }

    #[test]
    fn test_plain_a4_page() {
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );

        // 6 sender lines + greeting + 4 recipient lines, nothing else
        assert_eq!(commands.len(), 11);
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Rect { .. })));
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Image { .. })));

        // Sender block: first line bold at margin + offset, then 8 mm steps
        let text_cmds = texts(&commands);
        for (i, cmd) in text_cmds[..6].iter().enumerate() {
            let DrawCommand::Text { x, y, size_pt, bold, .. } = cmd else {
                unreachable!()
            };
            assert_eq!(*x, 20.0);
            assert_eq!(*y, 62.0 + i as f64 * 8.0);
            assert_eq!(*size_pt, 18.0);
            assert_eq!(*bold, i == 0);
        }

        // Greeting on the recipient anchor
        let DrawCommand::Text { x, y, text, size_pt, bold } = text_cmds[6] else {
            unreachable!()
        };
        assert_eq!(text, "เรียน");
        assert_eq!((*x, *y), (297.0 * 0.30, 210.0 * 0.60));
        assert_eq!(*size_pt, 26.0);
        assert!(*bold);
    }

    #[test]
    fn test_greeting_left_indents_detail_column() {
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings {
                text: "เรียน".to_string(),
                position: GreetingPosition::Left,
            },
            &LogoSettings::default(),
            &StubMeasurer,
        );

        let text_cmds = texts(&commands);
        let DrawCommand::Text { x: greeting_x, .. } = text_cmds[6] else {
            unreachable!()
        };
        let DrawCommand::Text { x: title_x, y: title_y, .. } = text_cmds[7] else {
            unreachable!()
        };

        // Detail column starts past the measured greeting width plus the gap
        let greeting_width = StubMeasurer.width_mm("เรียน", 26.0, true);
        assert_eq!(*title_x, greeting_x + greeting_width + 8.0);
        assert!(*title_x > greeting_x + greeting_width);
        assert_eq!(*title_y, 210.0 * 0.60);
    }

    #[test]
    fn test_greeting_top_keeps_column_flush() {
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings {
                text: "เรียน".to_string(),
                position: GreetingPosition::Top,
            },
            &LogoSettings::default(),
            &StubMeasurer,
        );

        let text_cmds = texts(&commands);
        let DrawCommand::Text { x: greeting_x, y: greeting_y, .. } = text_cmds[6] else {
            unreachable!()
        };
        let DrawCommand::Text { x: title_x, y: title_y, .. } = text_cmds[7] else {
            unreachable!()
        };

        assert_eq!(*greeting_x, 297.0 * 0.30);
        assert_eq!(*greeting_y, 210.0 * 0.60 - 12.0);
        assert_eq!(*title_x, *greeting_x);
        assert_eq!(*title_y, 210.0 * 0.60);
    }

    #[test]
    fn test_empty_greeting_never_indents() {
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings {
                text: String::new(),
                position: GreetingPosition::Left,
            },
            &LogoSettings::default(),
            &StubMeasurer,
        );

        // No greeting command, detail column flush at the anchor
        assert_eq!(texts(&commands).len(), 10);
        let DrawCommand::Text { x, .. } = texts(&commands)[6] else {
            unreachable!()
        };
        assert_eq!(*x, 297.0 * 0.30);
    }

    #[test]
    fn test_postal_line_uses_fixed_offset() {
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );

        let text_cmds = texts(&commands);
        let ys: Vec<f64> = text_cmds[7..11]
            .iter()
            .map(|c| {
                let DrawCommand::Text { y, .. } = c else { unreachable!() };
                *y
            })
            .collect();

        let base = 210.0 * 0.60;
        assert_eq!(ys, vec![base, base + 12.0, base + 12.0 * 2.0, base + 39.0]);
        // The asymmetry is the point: 39 != 3 * 12
        assert!(ys[3] != ys[0] + 3.0 * 12.0);
    }

    #[test]
    fn test_disabled_stamp_emits_nothing() {
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings {
                enabled: false,
                text: "ชำระค่าฝากส่ง\nใบอนุญาตเลขที่ 9/2567".to_string(),
            },
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );

        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Rect { .. })));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { size_pt, .. } if *size_pt == 14.0)));
    }

    #[test]
    fn test_stamp_box_sized_by_longest_line() {
        // Middle line is the longest
        let stamp = StampSettings {
            enabled: true,
            text: "สั้น\nบรรทัดกลางที่ยาวที่สุด\nสั้นมาก".to_string(),
        };
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &stamp,
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );

        let rect = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Rect { x, y, width, height } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .expect("stamp rect");

        let longest = StubMeasurer.width_mm("บรรทัดกลางที่ยาวที่สุด", 14.0, false);
        assert_eq!(rect.2, longest + 3.0 * 2.0);
        assert_eq!(rect.3, 3.0 * 7.0 + 1.5 * 2.0);
        // Right-aligned against the margin, pulled above it
        assert_eq!(rect.0, 297.0 - 20.0 - rect.2);
        assert_eq!(rect.1, 20.0 - 5.0);

        // Stamp lines are centered within the box
        let middle = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { x, text, .. } if text.contains("กลาง") => Some(*x),
                _ => None,
            })
            .unwrap();
        assert_eq!(middle, rect.0 + (rect.2 - longest) / 2.0);

        let first = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { x, text, .. } if text == "สั้น" => Some(*x),
                _ => None,
            })
            .unwrap();
        let short_width = StubMeasurer.width_mm("สั้น", 14.0, false);
        assert_eq!(first, rect.0 + (rect.2 - short_width) / 2.0);
    }

    #[test]
    fn test_stamp_width_grows_with_text() {
        let width_of = |text: &str| {
            let commands = compute_page(
                PaperProfile::A4Landscape,
                &sender(),
                &recipient(),
                &StampSettings {
                    enabled: true,
                    text: text.to_string(),
                },
                &GreetingSettings::default(),
                &LogoSettings::default(),
                &StubMeasurer,
            );
            commands
                .iter()
                .find_map(|c| match c {
                    DrawCommand::Rect { width, .. } => Some(*width),
                    _ => None,
                })
                .unwrap()
        };

        assert!(width_of("กข") < width_of("กขคง"));
        // Never narrower than its own padding
        assert!(width_of("ก") >= 2.0 * 3.0);
    }

    #[test]
    fn test_logo_disabled_or_unset_emits_nothing() {
        for logo in [
            LogoSettings {
                enabled: false,
                source_ref: "logo".to_string(),
                ..LogoSettings::default()
            },
            LogoSettings {
                enabled: true,
                source_ref: String::new(),
                ..LogoSettings::default()
            },
        ] {
            let commands = compute_page(
                PaperProfile::A4Landscape,
                &sender(),
                &recipient(),
                &StampSettings::default(),
                &GreetingSettings::default(),
                &logo,
                &StubMeasurer,
            );
            assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
        }
    }

    #[test]
    fn test_logo_geometry() {
        let logo = LogoSettings {
            enabled: true,
            source_ref: "logo".to_string(),
            aspect_ratio: 1.6,
            custom_height_mm: None,
        };
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &logo,
            &StubMeasurer,
        );

        let image = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Image { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .expect("logo image");

        assert_eq!(image.0, 20.0);
        assert_eq!(image.3, 20.5);
        assert_eq!(image.2, 20.5 * 1.6);
        // Bottom edge sits one gap above the first sender baseline
        assert_eq!(image.1 + image.3 + 8.0, 62.0);
    }

    #[test]
    fn test_logo_custom_height() {
        let logo = LogoSettings {
            enabled: true,
            source_ref: "logo".to_string(),
            aspect_ratio: 2.0,
            custom_height_mm: Some(15.0),
        };
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &logo,
            &StubMeasurer,
        );

        let DrawCommand::Image { width, height, .. } = &commands[0] else {
            panic!("expected logo first");
        };
        assert_eq!(*height, 15.0);
        assert_eq!(*width, 30.0);

        // Non-positive override falls back to the profile default
        let logo = LogoSettings {
            custom_height_mm: Some(0.0),
            ..logo
        };
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &logo,
            &StubMeasurer,
        );
        let DrawCommand::Image { height, .. } = &commands[0] else {
            panic!("expected logo first");
        };
        assert_eq!(*height, 20.5);
    }

    #[test]
    fn test_unit_aspect_ratio_gives_square_logo() {
        let logo = LogoSettings {
            enabled: true,
            source_ref: "logo".to_string(),
            aspect_ratio: 1.0,
            custom_height_mm: None,
        };
        let commands = compute_page(
            PaperProfile::Envelope108x235,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &logo,
            &StubMeasurer,
        );

        let DrawCommand::Image { width, height, .. } = &commands[0] else {
            panic!("expected logo first");
        };
        assert_eq!(width, height);
        assert_eq!(*height, 12.0);
    }

    #[test]
    fn test_envelope_profile_anchor() {
        let commands = compute_page(
            PaperProfile::Envelope108x235,
            &sender(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );

        let text_cmds = texts(&commands);
        let DrawCommand::Text { x, y, size_pt, .. } = text_cmds[6] else {
            unreachable!()
        };
        assert_eq!((*x, *y), (235.0 * 0.35, 108.0 * 0.55));
        assert_eq!(*size_pt, 20.0);
    }

    #[test]
    fn test_empty_sender_fields_still_occupy_lines() {
        let commands = compute_page(
            PaperProfile::A4Landscape,
            &SenderRecord::default(),
            &recipient(),
            &StampSettings::default(),
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );

        let sender_cmds = texts(&commands);
        // Six commands, blank text, fixed positions
        let DrawCommand::Text { y, text, .. } = sender_cmds[5] else {
            unreachable!()
        };
        assert_eq!(text, "");
        assert_eq!(*y, 62.0 + 5.0 * 8.0);
    }

    #[test]
    fn test_pages_follow_recipient_order() {
        let recipients = vec![
            RecipientRecord {
                title: "หนึ่ง".to_string(),
                ..RecipientRecord::default()
            },
            RecipientRecord {
                title: "สอง".to_string(),
                ..RecipientRecord::default()
            },
            RecipientRecord {
                title: "สาม".to_string(),
                ..RecipientRecord::default()
            },
        ];

        let pages = compute_pages(
            PaperProfile::A4Landscape,
            &sender(),
            &recipients,
            &StampSettings::default(),
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );

        assert_eq!(pages.len(), 3);
        for (page, expected) in pages.iter().zip(["หนึ่ง", "สอง", "สาม"]) {
            assert!(page.iter().any(
                |c| matches!(c, DrawCommand::Text { text, .. } if text == expected)
            ));
        }

        let none = compute_pages(
            PaperProfile::A4Landscape,
            &sender(),
            &[],
            &StampSettings::default(),
            &GreetingSettings::default(),
            &LogoSettings::default(),
            &StubMeasurer,
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let run = || {
            compute_page(
                PaperProfile::A4Landscape,
                &sender(),
                &recipient(),
                &StampSettings {
                    enabled: true,
                    text: label_data::DEFAULT_STAMP_TEXT.to_string(),
                },
                &GreetingSettings::default(),
                &LogoSettings {
                    enabled: true,
                    source_ref: "logo".to_string(),
                    aspect_ratio: 1.25,
                    custom_height_mm: Some(18.0),
                },
                &StubMeasurer,
            )
        };

        assert_eq!(run(), run());
    }
}
