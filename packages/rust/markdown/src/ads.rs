//! Ad slot interleaving.

/// Bodies with this many blocks or fewer get no ads.
const MIN_BLOCKS_FOR_ADS: usize = 5;

/// Insert three ad slots at 25%, 50% and 75% of the block sequence.
///
/// Positions are computed from the original block count and inserted from the
/// highest index down so earlier positions stay valid. Slots are numbered in
/// reading order (`data-ad-position` 1..=3). Returns the number of slots added.
pub(crate) fn interleave(blocks: &mut Vec<String>, ad_client: &str) -> usize {
    let count = blocks.len();
    if count <= MIN_BLOCKS_FOR_ADS {
        return 0;
    }

    let positions = [count / 4, count / 2, count * 3 / 4];
    for (slot, &index) in positions.iter().enumerate().rev() {
        blocks.insert(index, ad_block(ad_client, slot + 1));
    }

    positions.len()
}

/// Markup for a single ad placeholder.
///
/// The inline script queues the slot with the ad loader the page layout puts
/// in `<head>`.
pub(crate) fn ad_block(ad_client: &str, position: usize) -> String {
    format!(
        r#"<div class="my-8 ad-slot" data-ad-position="{position}"><ins class="adsbygoogle" style="display:block" data-ad-client="{}" data-ad-slot="auto" data-ad-format="auto" data-full-width-responsive="true"></ins><script>(adsbygoogle = window.adsbygoogle || []).push({{}});</script></div>"#,
        ad_client.replace('"', "&quot;")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("<p>{i}</p>")).collect()
    }

    #[test]
    fn short_bodies_get_no_ads() {
        let mut b = blocks(5);
        assert_eq!(interleave(&mut b, "ca-pub-test"), 0);
        assert_eq!(b.len(), 5);
    }

    #[test]
    fn ads_land_before_quartile_blocks() {
        let mut b = blocks(8);
        assert_eq!(interleave(&mut b, "ca-pub-test"), 3);
        assert_eq!(b.len(), 11);

        // Original indices 2, 4, 6 are preceded by slots 1, 2, 3.
        assert!(b[2].contains(r#"data-ad-position="1""#));
        assert_eq!(b[3], "<p>2</p>");
        assert!(b[5].contains(r#"data-ad-position="2""#));
        assert_eq!(b[6], "<p>4</p>");
        assert!(b[8].contains(r#"data-ad-position="3""#));
        assert_eq!(b[9], "<p>6</p>");
    }

    #[test]
    fn six_blocks_still_get_three_distinct_slots() {
        let mut b = blocks(6);
        interleave(&mut b, "ca-pub-test");
        let slots: Vec<usize> = b
            .iter()
            .enumerate()
            .filter(|(_, block)| block.contains("adsbygoogle"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(slots.len(), 3);
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ad_block_carries_client() {
        let html = ad_block("ca-pub-123", 2);
        assert!(html.contains(r#"data-ad-client="ca-pub-123""#));
        assert!(html.contains(r#"data-ad-position="2""#));
    }

    #[test]
    fn ad_block_queues_its_slot() {
        let html = ad_block("ca-pub-123", 1);
        let ins_end = html.find("</ins>").expect("ins");
        let push = html
            .find("<script>(adsbygoogle = window.adsbygoogle || []).push({});</script>")
            .expect("push script");
        assert!(push > ins_end);
        assert!(html.ends_with("</script></div>"));
    }
}
