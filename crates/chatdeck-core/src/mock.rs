//! Canned assistant replies used in place of a real model call.

/// The fixed reply table.
pub const MOCK_RESPONSES: [&str; 5] = [
    "That's a great question! Let me break this down for you.\n\nHere's what I'd recommend:\n\n1. **Start with the fundamentals** — build a solid understanding of the core concepts before tackling the advanced stuff.\n\n2. **Iterate quickly** — don't aim for perfection on the first pass. Get something working, then refine.\n\n3. **Leverage existing tools** — there's no need to reinvent the wheel when great libraries already exist.\n\nWant me to dive deeper into any of these points?",
    "I'd be happy to help with that! Here's my approach:\n\nFirst, let's consider the **key constraints** you're working with. Understanding boundaries helps us find the most practical solution.\n\nThen we can explore a few different strategies:\n\n- **Option A**: The straightforward approach — simple, reliable, easy to maintain\n- **Option B**: A more sophisticated solution — better performance but higher complexity\n- **Option C**: The hybrid approach — balances simplicity with capability\n\nWhich direction interests you most?",
    "Absolutely, let me walk you through this step by step.\n\n```python\n# Here's a clean implementation\ndef solve(data):\n    result = process(data)\n    return optimize(result)\n```\n\nThe key insight here is that we're **separating concerns** — the processing logic stays independent from the optimization layer. This makes testing much easier and the code more maintainable.\n\nShall I explain any part in more detail?",
    "Great thinking! That's actually one of the more interesting challenges in this space.\n\nThe short answer is: **it depends on your priorities**. Here's the tradeoff matrix:\n\n| Approach | Speed | Reliability | Complexity |\n|----------|-------|------------|------------|\n| Streaming | Fast | Medium | High |\n| Batch | Slow | High | Low |\n| Hybrid | Medium | High | Medium |\n\nFor most use cases, I'd lean toward the **hybrid approach**. It gives you the responsiveness of streaming with the reliability guarantees of batch processing.\n\nWhat's your current setup looking like?",
    "That's a fascinating problem! Let me share a perspective you might not have considered.\n\nThe conventional wisdom says to optimize early, but in practice, **premature optimization is the root of all evil** (as Knuth famously noted). Instead:\n\n1. Get it working correctly first\n2. Measure actual performance\n3. Optimize the real bottlenecks\n\nI've seen teams spend weeks optimizing code paths that account for less than 1% of total execution time. The data should always drive your decisions.\n\nWould you like to discuss profiling strategies?",
];

/// Pick a canned reply from the character count of `input`.
///
/// Inputs of equal length always get the same reply.
pub fn mock_response(input: &str) -> &'static str {
    MOCK_RESPONSES[input.chars().count() % MOCK_RESPONSES.len()]
}
